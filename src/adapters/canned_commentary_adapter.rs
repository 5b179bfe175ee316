//! Offline commentary provider.
//!
//! Renders a short Markdown outline from the current moving-average trend.
//! Stands in for a remote language-model service when running headless.

use crate::domain::indicator::MovingAverage;
use crate::ports::commentary_port::{CommentaryError, CommentaryPort, CommentaryRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    /// Compares the newest values of both averages.
    pub fn from_averages(short: &MovingAverage, long: &MovingAverage) -> Self {
        match (short.last(), long.last()) {
            (Some(s), Some(l)) if s.value > l.value => Trend::Bullish,
            (Some(s), Some(l)) if s.value < l.value => Trend::Bearish,
            _ => Trend::Neutral,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
            Trend::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CannedCommentaryAdapter {
    trend: Trend,
}

impl CannedCommentaryAdapter {
    pub fn new(trend: Trend) -> Self {
        CannedCommentaryAdapter { trend }
    }
}

impl Default for CannedCommentaryAdapter {
    fn default() -> Self {
        Self::new(Trend::Neutral)
    }
}

impl CommentaryPort for CannedCommentaryAdapter {
    fn market_insight(&self, request: &CommentaryRequest) -> Result<String, CommentaryError> {
        if request.instrument_symbol.trim().is_empty() {
            return Err(CommentaryError::NotConfigured {
                reason: "instrument symbol is empty".into(),
            });
        }

        let momentum = match self.trend {
            Trend::Bullish => "the short average is trading above the long average",
            Trend::Bearish => "the short average is trading below the long average",
            Trend::Neutral => "the short and long averages are converged",
        };

        Ok(format!(
            "### {name} ({symbol})\n\n\
             - **Outlook**: {outlook}; {momentum}.\n\
             - **Key Factors**:\n  \
               - Simulated random-walk price action\n  \
               - Moving-average crossover momentum\n\
             - **Potential Risks**:\n  \
               - Whipsaw signals in range-bound markets\n",
            name = request.instrument_name,
            symbol = request.instrument_symbol,
            outlook = self.trend.label(),
        ))
    }
}
