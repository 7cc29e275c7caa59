use serde::{Deserialize, Serialize};

/// Business details shown on public pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub business_name: Option<String>,
    pub logo_url: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub footer_text: Option<String>,
}

impl BusinessProfile {
    /// Field by field: first non-blank value from `primary`, then `fallback`.
    pub fn merged(primary: Option<&Self>, fallback: Option<&Self>) -> Self {
        fn pick(a: Option<&String>, b: Option<&String>) -> Option<String> {
            a.into_iter()
                .chain(b)
                .find(|v| !v.trim().is_empty())
                .cloned()
        }

        let empty = Self::default();
        let p = primary.unwrap_or(&empty);
        let f = fallback.unwrap_or(&empty);

        Self {
            business_name: pick(p.business_name.as_ref(), f.business_name.as_ref()),
            logo_url: pick(p.logo_url.as_ref(), f.logo_url.as_ref()),
            address: pick(p.address.as_ref(), f.address.as_ref()),
            email: pick(p.email.as_ref(), f.email.as_ref()),
            phone: pick(p.phone.as_ref(), f.phone.as_ref()),
            footer_text: pick(p.footer_text.as_ref(), f.footer_text.as_ref()),
        }
    }
}

/// Row of the `business_settings` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessSettings {
    pub owner_email: String,
    #[serde(flatten)]
    pub profile: BusinessProfile,
}

/// Row of the `users` collection; the secondary source of business details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_logo_url: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<&UserAccount> for BusinessProfile {
    fn from(user: &UserAccount) -> Self {
        Self {
            business_name: user.company_name.clone().or_else(|| user.full_name.clone()),
            logo_url: user.company_logo_url.clone(),
            address: user.address.clone(),
            email: Some(user.email.clone()),
            phone: user.phone.clone(),
            footer_text: None,
        }
    }
}
