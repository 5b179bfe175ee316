//! Market commentary provider port.
//!
//! Commentary is a best-effort annotation for display. A failure never
//! reaches the engine: [`fetch_commentary`] turns it into a readable message.

use tracing::warn;

use crate::domain::instrument::Instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryRequest {
    pub instrument_name: String,
    pub instrument_symbol: String,
}

impl From<&Instrument> for CommentaryRequest {
    fn from(instrument: &Instrument) -> Self {
        CommentaryRequest {
            instrument_name: instrument.name.clone(),
            instrument_symbol: instrument.id.to_string(),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CommentaryError {
    #[error("provider is not configured: {reason}")]
    NotConfigured { reason: String },

    #[error("request failed: {reason}")]
    Transport { reason: String },

    #[error("provider returned an empty response")]
    EmptyResponse,
}

pub trait CommentaryPort {
    fn market_insight(&self, request: &CommentaryRequest) -> Result<String, CommentaryError>;
}

/// Asks `provider` once for commentary on `instrument`. Errors become a
/// display string and are not retried.
pub fn fetch_commentary(provider: &dyn CommentaryPort, instrument: &Instrument) -> String {
    let request = CommentaryRequest::from(instrument);
    match provider.market_insight(&request) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => failure_message(&CommentaryError::EmptyResponse),
        Err(e) => {
            warn!(instrument = %instrument.id, error = %e, "commentary request failed");
            failure_message(&e)
        }
    }
}

fn failure_message(err: &CommentaryError) -> String {
    format!("Failed to get analysis. Reason: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(Result<String, CommentaryError>);

    impl CommentaryPort for FixedProvider {
        fn market_insight(&self, _request: &CommentaryRequest) -> Result<String, CommentaryError> {
            self.0.clone()
        }
    }

    fn gem() -> Instrument {
        Instrument::new("GEM", "Gemini Technologies")
    }

    #[test]
    fn request_from_instrument() {
        let request = CommentaryRequest::from(&gem());
        assert_eq!(request.instrument_name, "Gemini Technologies");
        assert_eq!(request.instrument_symbol, "GEM");
    }

    #[test]
    fn success_passes_text_through() {
        let provider = FixedProvider(Ok("**Outlook**: neutral".into()));
        assert_eq!(fetch_commentary(&provider, &gem()), "**Outlook**: neutral");
    }

    #[test]
    fn failure_becomes_message() {
        let provider = FixedProvider(Err(CommentaryError::Transport {
            reason: "timed out".into(),
        }));
        assert_eq!(
            fetch_commentary(&provider, &gem()),
            "Failed to get analysis. Reason: request failed: timed out"
        );
    }

    #[test]
    fn blank_response_becomes_message() {
        let provider = FixedProvider(Ok("   ".into()));
        assert_eq!(
            fetch_commentary(&provider, &gem()),
            "Failed to get analysis. Reason: provider returned an empty response"
        );
    }
}
