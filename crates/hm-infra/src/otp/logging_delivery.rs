use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use hm_core::ports::{OtpDeliveryPort, OtpRequest};

/// OTP delivery that only records the request in the log.
///
/// Stands in for the SMS gateway in local runs. The national ID is logged masked.
#[derive(Debug, Default)]
pub struct LoggingOtpDelivery {
    sent: AtomicUsize,
}

impl LoggingOtpDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of codes requested so far.
    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl OtpDeliveryPort for LoggingOtpDelivery {
    async fn send_code(&self, request: &OtpRequest) -> anyhow::Result<()> {
        let attempt = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            phone = %request.international_phone(),
            national_id = %request.national_id,
            attempt,
            "one-time code requested"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hm_core::registration::NationalId;

    #[tokio::test]
    async fn counts_every_request() {
        let delivery = LoggingOtpDelivery::new();
        let request = OtpRequest {
            country_code: "+91".to_string(),
            phone: "9876543210".to_string(),
            national_id: NationalId::parse("123412341234").unwrap(),
        };

        delivery.send_code(&request).await.unwrap();
        delivery.send_code(&request).await.unwrap();

        assert_eq!(delivery.sent_count(), 2);
    }
}
