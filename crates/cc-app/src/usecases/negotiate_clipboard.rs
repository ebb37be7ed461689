use std::rc::Rc;

use cc_core::clipboard::{ClipboardAttempt, ExtractionPayload, NotCopiedReason, RichCopyOutcome};
use cc_core::ports::RichClipboardPort;
use tracing::{info_span, Instrument};

/// One way of packaging a payload into a structured clipboard write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStrategy {
    /// Text, HTML and every image with a distinct type.
    Full,
    /// Text and HTML only; images dropped.
    TextAndHtml,
}

impl AttemptStrategy {
    /// Strategies to try for `payload`, richest first.
    pub fn plan(payload: &ExtractionPayload) -> Vec<AttemptStrategy> {
        if payload.has_images() {
            vec![AttemptStrategy::Full, AttemptStrategy::TextAndHtml]
        } else {
            vec![AttemptStrategy::TextAndHtml]
        }
    }

    /// Whether attempts built for this strategy carry image parts.
    pub fn includes_images(self) -> bool {
        matches!(self, AttemptStrategy::Full)
    }
}

/// Outcome of submitting a single strategy.
#[derive(Debug)]
enum StepResult {
    Accepted(ClipboardAttempt),
    Rejected,
    Empty,
}

/// Writes a payload through the structured clipboard, degrading until the
/// platform accepts an attempt.
pub struct NegotiateClipboard {
    clipboard: Rc<dyn RichClipboardPort>,
}

impl NegotiateClipboard {
    pub fn new(clipboard: Rc<dyn RichClipboardPort>) -> Self {
        Self { clipboard }
    }

    /// Writes `payload` to the structured clipboard, dropping images when
    /// the full write is refused.
    pub async fn execute(&self, payload: &ExtractionPayload) -> RichCopyOutcome {
        let span = info_span!("usecase.negotiate_clipboard.execute");
        self.negotiate(payload).instrument(span).await
    }

    async fn negotiate(&self, payload: &ExtractionPayload) -> RichCopyOutcome {
        if !self.clipboard.is_available() {
            tracing::info!("structured clipboard unavailable");
            return RichCopyOutcome::NotCopied(NotCopiedReason::Unavailable);
        }

        let mut submitted = false;
        for strategy in AttemptStrategy::plan(payload) {
            match self.try_strategy(payload, strategy).await {
                StepResult::Accepted(attempt) => {
                    let included = attempt.included();
                    tracing::info!(
                        ?strategy,
                        text = included.text_included,
                        html = included.html_included,
                        images = included.images_included,
                        "structured clipboard write accepted"
                    );
                    return RichCopyOutcome::Copied(included);
                }
                StepResult::Rejected => submitted = true,
                StepResult::Empty => {}
            }
        }

        let reason = if submitted {
            NotCopiedReason::Rejected
        } else {
            NotCopiedReason::NothingToSend
        };
        RichCopyOutcome::NotCopied(reason)
    }

    async fn try_strategy(
        &self,
        payload: &ExtractionPayload,
        strategy: AttemptStrategy,
    ) -> StepResult {
        let Some(attempt) = ClipboardAttempt::build(payload, strategy.includes_images()) else {
            tracing::debug!(?strategy, "nothing to write for strategy");
            return StepResult::Empty;
        };

        match self.clipboard.write(&attempt).await {
            Ok(()) => StepResult::Accepted(attempt),
            Err(err) => {
                tracing::warn!(?strategy, error = %err, "structured clipboard write rejected");
                StepResult::Rejected
            }
        }
    }
}
