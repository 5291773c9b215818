//! Prometheus counters for the board API.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

use crate::{REPLIES_ROUTE, THREADS_ROUTE};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Operation {
    CreateThread,
    ListThreads,
    DeleteThread,
    ReportThread,
    CreateReply,
    ViewThread,
    DeleteReply,
    ReportReply,
}

impl Operation {
    /// Maps an HTTP method and matched route template to its operation.
    pub fn resolve(method: &str, route: &str) -> Option<Self> {
        let op = match (route, method) {
            (THREADS_ROUTE, "POST") => Operation::CreateThread,
            (THREADS_ROUTE, "GET") => Operation::ListThreads,
            (THREADS_ROUTE, "DELETE") => Operation::DeleteThread,
            (THREADS_ROUTE, "PUT") => Operation::ReportThread,
            (REPLIES_ROUTE, "POST") => Operation::CreateReply,
            (REPLIES_ROUTE, "GET") => Operation::ViewThread,
            (REPLIES_ROUTE, "DELETE") => Operation::DeleteReply,
            (REPLIES_ROUTE, "PUT") => Operation::ReportReply,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Outcome {
    Ok,
    ClientError,
    ServerError,
}

impl Outcome {
    pub fn from_status(status: u16) -> Self {
        match status {
            500..=u16::MAX => Outcome::ServerError,
            400..=499 => Outcome::ClientError,
            _ => Outcome::Ok,
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct OperationLabels {
    operation: Operation,
    outcome: Outcome,
}

pub struct Metrics {
    registry: Registry,
    operations: Family<OperationLabels, Counter>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let operations = Family::<OperationLabels, Counter>::default();
        registry.register(
            "board_operations",
            "Board API operations by outcome",
            operations.clone(),
        );
        Self { registry, operations }
    }

    pub fn record(&self, operation: Operation, outcome: Outcome) {
        self.operations
            .get_or_create(&OperationLabels { operation, outcome })
            .inc();
    }

    pub fn count(&self, operation: Operation, outcome: Outcome) -> u64 {
        self.operations
            .get_or_create(&OperationLabels { operation, outcome })
            .get()
    }

    /// OpenMetrics text exposition of everything registered.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        encode(&mut out, &self.registry)?;
        Ok(out)
    }
}
