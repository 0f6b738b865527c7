use crate::error::{Error, EstimatorResult, ReportDisplayExt};
use crate::models::fee::FeeConfig;
use crate::models::intent::{MinAmountOut, SwapIntent, TradeOptions};
use crate::models::route::RouteSource;
use crate::models::swap::{AssembledSwap, ContractCall};
use crate::routers::AggregatorApi;
use crate::routers::estimate::{MinAmountOutEstimate, update_min_amount_out};
use crate::routers::swap::assemble;
use crate::utils::fee::fee_preview;
use error_stack::Report;
use std::fmt;

/// Operator input, untouched by submissions
#[derive(Debug, Clone, PartialEq)]
pub struct SwapForm {
    pub intent: SwapIntent,
    pub fee_config: Option<FeeConfig>,
    pub options: TradeOptions,
    pub route_source: RouteSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionFailure {
    pub error: Error,
    /// Printable attachments of the report, for the operator
    pub details: String,
}

impl From<Report<Error>> for SubmissionFailure {
    fn from(report: Report<Error>) -> Self {
        Self {
            error: report.current_context().clone(),
            details: report.format(),
        }
    }
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.details.is_empty() {
            write!(f, "{}", self.error)
        } else {
            write!(f, "{} ({})", self.error, self.details)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Computing,
    Ready(AssembledSwap),
    Failed(SubmissionFailure),
    /// Outputs dropped after a result, form kept
    Cleared,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Computing => "computing",
            SessionState::Ready(_) => "ready",
            SessionState::Failed(_) => "failed",
            SessionState::Cleared => "cleared",
        }
    }
}

/// One operator session over an aggregator.
///
/// `submit` takes `&mut self`, so submissions never overlap. Dropping a
/// pending `submit` future cancels its request and leaves the session in
/// `Computing` until the next submission overwrites it.
pub struct SwapSession<A: AggregatorApi> {
    api: A,
    form: SwapForm,
    state: SessionState,
}

impl<A: AggregatorApi> SwapSession<A> {
    pub fn new(api: A, form: SwapForm) -> Self {
        Self {
            api,
            form,
            state: SessionState::Idle,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn form(&self) -> &SwapForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SwapForm {
        &mut self.form
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn result(&self) -> Option<&AssembledSwap> {
        match &self.state {
            SessionState::Ready(swap) => Some(swap),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&SubmissionFailure> {
        match &self.state {
            SessionState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    fn transition(&mut self, state: SessionState) {
        tracing::debug!(from = self.state.name(), to = state.name(), "Session state change");
        self.state = state;
    }

    /// Drops every derived output. Only a finished submission can be cleared.
    pub fn clear(&mut self) -> bool {
        match self.state {
            SessionState::Ready(_) | SessionState::Failed(_) => {
                self.transition(SessionState::Cleared);
                true
            }
            _ => false,
        }
    }

    pub async fn submit(&mut self) -> Result<AssembledSwap, SubmissionFailure> {
        if matches!(self.state, SessionState::Computing) {
            tracing::warn!("Previous submission was cancelled before finishing");
        }
        // Never show a stale result next to a running submission
        self.transition(SessionState::Computing);

        let result = assemble(
            &self.api,
            &self.form.intent,
            self.form.fee_config.as_ref(),
            &self.form.options,
            &self.form.route_source,
        )
        .await;

        match result {
            Ok(swap) => {
                self.transition(SessionState::Ready(swap.clone()));
                Ok(swap)
            }
            Err(report) => {
                tracing::error!("Submission failed: {report:?}");
                let failure = SubmissionFailure::from(report);
                self.transition(SessionState::Failed(failure.clone()));
                Err(failure)
            }
        }
    }

    /// Derives a fresh minimum output and stores it as the manual value for the next submission
    pub async fn update_min_amount_out(&mut self) -> EstimatorResult<MinAmountOutEstimate> {
        let estimate = update_min_amount_out(
            &self.api,
            &self.form.intent,
            self.form.fee_config.as_ref(),
            &self.form.options,
            &self.form.route_source,
        )
        .await?;

        self.form.options.min_amount_out = MinAmountOut::Manual(estimate.min_amount_out.to_string());
        Ok(estimate)
    }

    pub fn fee_preview(&self) -> Option<EstimatorResult<String>> {
        self.form.fee_config.as_ref().map(|fee| {
            fee_preview(
                fee,
                self.form.intent.token_in.decimals,
                self.form.intent.token_out.decimals,
            )
        })
    }

    /// Router call for the current result, sent from `from`
    pub fn contract_call(&self, router: &str, from: &str) -> Option<EstimatorResult<ContractCall>> {
        self.result()
            .map(|swap| swap.call_parameters.to_contract_call(router, from))
    }
}
