use async_trait::async_trait;

use crate::registration::NationalId;

/// Context handed to the OTP service when a code is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRequest {
    /// Country prefix, e.g. `+91`.
    pub country_code: String,
    /// Local number, digits only.
    pub phone: String,
    pub national_id: NationalId,
}

impl OtpRequest {
    pub fn international_phone(&self) -> String {
        format!("{}{}", self.country_code, self.phone)
    }
}

/// One-time code delivery.
///
/// Checking the code a user types is the service's job; the flow only needs the code
/// to be fully entered.
#[async_trait]
pub trait OtpDeliveryPort: Send + Sync {
    async fn send_code(&self, request: &OtpRequest) -> anyhow::Result<()>;
}
