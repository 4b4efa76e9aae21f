use crate::errors::AppError;
use url::Url;

/// Window/tab label handed to the opener alongside the link.
pub const LINK_TARGET: &str = "_blank";

/// Builds a pre-filled WhatsApp chat link of the fixed form
/// `https://wa.me/{phone}?text={encoded}`.
///
/// The message is encoded for the query component by the `url` crate.
/// The phone must already be digits-only (see `Prospect::from_source`);
/// an empty phone is rejected here as well so the link layer can never
/// produce a chat URL without a destination.
pub fn wa_link(phone: &str, message: &str) -> Result<String, AppError> {
    if phone.is_empty() {
        return Err(AppError::MissingPhone("empty phone number".to_string()));
    }

    let mut url = Url::parse(&format!("https://wa.me/{}", phone))
        .map_err(|e| AppError::Internal(format!("failed to build wa.me link: {}", e)))?;
    url.query_pairs_mut().append_pair("text", message);
    Ok(url.to_string())
}

/// Collaborator that actually opens a link (browser, OS handler, test
/// recorder). Fire-and-forget: the core consumes no return value.
pub trait LinkOpener {
    /// Opens `url` in the window named by `target`.
    fn open(&self, url: &str, target: &str);
}

/// Opener that only logs the link. Used by the CLI, where the operator
/// copies the printed URL.
#[derive(Debug, Default)]
pub struct LoggingOpener;

impl LinkOpener for LoggingOpener {
    fn open(&self, url: &str, target: &str) {
        tracing::info!("Opening link ({}): {}", target, url);
        println!("{}", url);
    }
}
