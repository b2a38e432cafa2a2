mod logging_delivery;

pub use logging_delivery::LoggingOtpDelivery;
