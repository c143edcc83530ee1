//! The signed-in user's profile: details, loyalty standing and documents.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use super::render::{heading, Notice, Style, Table, View};
use super::{AppContext, Page};
use crate::auth::guard::Route;
use crate::auth::session::AuthOutcome;
use crate::error::Result;
use crate::models::{Document, LoyaltyInfo, LoyaltyTier, LoyaltyTransaction, ProfileUpdate, User};
use crate::rules::documents::missing_documents;
use crate::rules::loyalty;

const PROFILE_UPDATED: &str = "Profile updated successfully!";

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfilePage;

/// Loyalty standing with the derived progress figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltySummary {
    pub points: i64,
    pub tier: LoyaltyTier,
    pub progress_percent: f64,
    pub next_tier_message: String,
    pub benefits: Vec<&'static str>,
    pub transactions: Vec<LoyaltyTransaction>,
}

impl From<LoyaltyInfo> for LoyaltySummary {
    fn from(info: LoyaltyInfo) -> Self {
        Self {
            progress_percent: loyalty::progress_percent(info.tier, info.points),
            next_tier_message: loyalty::next_tier_message(info.tier, info.points),
            benefits: loyalty::benefits(info.tier),
            points: info.points,
            tier: info.tier,
            transactions: info.transactions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user: User,
    /// Absent when the loyalty service could not be reached.
    pub loyalty: Option<LoyaltySummary>,
    pub documents: Vec<Document>,
    pub documents_complete: bool,
}

#[async_trait]
impl Page for ProfilePage {
    type View = ProfileView;

    fn route(&self) -> Route {
        Route::Profile
    }

    async fn load(&self, ctx: &AppContext) -> Result<ProfileView> {
        let users = ctx.client().users();
        let (user, loyalty, documents) =
            tokio::join!(users.profile(), users.loyalty(), users.documents());
        let user = user?;

        let loyalty = match loyalty {
            Ok(info) => Some(LoyaltySummary::from(info)),
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => {
                warn!("Could not load loyalty information: {}", e);
                None
            }
        };
        let documents = documents.unwrap_or_else(|e| {
            warn!("Could not load documents: {}", e);
            Vec::new()
        });

        Ok(ProfileView {
            documents_complete: missing_documents(&documents).is_empty(),
            user,
            loyalty,
            documents,
        })
    }
}

impl View for ProfileView {
    fn plain(&self, style: &Style) -> String {
        let user = &self.user;
        let mut out = heading(&user.display_name());
        let _ = writeln!(out, "Email:    {}", user.email);
        let _ = writeln!(out, "Phone:    {}", user.phone_number.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "Address:  {}", user.address.as_deref().unwrap_or("-"));
        if let Some(since) = user.registration_date {
            let _ = writeln!(out, "Member since {}", style.datetime(since));
        }

        if let Some(loyalty) = &self.loyalty {
            let _ = writeln!(
                out,
                "\nLoyalty: {} tier, {} points ({:.0}%)",
                loyalty.tier, loyalty.points, loyalty.progress_percent
            );
            if !loyalty.next_tier_message.is_empty() {
                let _ = writeln!(out, "  {}", loyalty.next_tier_message);
            }
            out.push_str("Benefits:\n");
            for benefit in &loyalty.benefits {
                let _ = writeln!(out, "  - {benefit}");
            }
            if !loyalty.transactions.is_empty() {
                out.push_str("Recent points:\n");
                for tx in &loyalty.transactions {
                    let sign = if tx.points >= 0 { "+" } else { "" };
                    let _ = writeln!(
                        out,
                        "  {}{:<6} {:<9} {}",
                        sign, tx.points, tx.transaction_type, tx.description
                    );
                }
            }
        }

        out.push_str("\nDocuments:\n");
        if self.documents.is_empty() {
            out.push_str("  You haven't uploaded any documents yet.\n");
        }
        for doc in &self.documents {
            let _ = writeln!(
                out,
                "  {:<17} {}",
                doc.document_type.label(),
                if doc.is_verified { "Verified" } else { "Pending verification" }
            );
        }
        if !self.documents_complete {
            out.push_str("  Upload your documents with `rentctl documents upload`.\n");
        }
        out
    }

    fn table(&self, style: &Style) -> String {
        let mut table = Table::new(&["Document", "Number", "Uploaded", "Status"]);
        for doc in &self.documents {
            table.row(vec![
                doc.document_type.label().to_string(),
                doc.document_number.clone().unwrap_or_default(),
                doc.upload_date.map(|d| style.datetime(d)).unwrap_or_default(),
                if doc.is_verified { "Verified" } else { "Pending" }.to_string(),
            ]);
        }
        format!("{}{}", heading(&self.user.display_name()), table.render())
    }
}

/// Save name, phone and address.
///
/// # Errors
///
/// Returns an error when not logged in; other failures are reported in the
/// notice.
pub async fn update(ctx: &mut AppContext, update: &ProfileUpdate) -> Result<Notice> {
    ctx.enter(&Route::Profile)?;
    Ok(match ctx.session_mut().update_profile(update).await {
        AuthOutcome::Success => Notice::success(PROFILE_UPDATED),
        AuthOutcome::Failed { message } => Notice::failure(message),
    })
}
