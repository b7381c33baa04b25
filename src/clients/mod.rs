pub mod emailjs_client;

pub use emailjs_client::{DeliveryReceipt, EmailDelivery, EmailJsClient};
