use std::fmt;

/// Errors raised by graph construction and the analysis stages.
///
/// Every error is local to the call that produced it: no stage records a
/// partial result before failing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// An edge endpoint, label target or path source lies outside the graph.
    #[error("invalid vertex {vertex}: graph has {vertex_count} vertices")]
    InvalidVertex { vertex: usize, vertex_count: usize },

    /// An edge weight was NaN or infinite.
    #[error("edge {from} -> {to} has non-finite weight {weight}")]
    NonFiniteWeight { from: usize, to: usize, weight: f64 },

    /// Condensation was requested with components that do not belong to
    /// the graph being condensed.
    #[error("components do not partition this graph: {reason}")]
    PrecedesComponents { reason: String },

    /// A DAG-only computation was invoked on a graph that contains a cycle.
    #[error("graph contains a cycle ({remaining} vertices could not be ordered)")]
    CyclicGraph { remaining: usize },

    /// A path distance left the finite range while relaxing `from -> to`.
    #[error("path distance overflowed while relaxing edge {from} -> {to}")]
    DistanceOverflow { from: usize, to: usize },
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidVertex { .. } => ErrorCode::InvalidVertex,
            Self::NonFiniteWeight { .. } => ErrorCode::NonFiniteWeight,
            Self::PrecedesComponents { .. } => ErrorCode::ComponentsMismatch,
            Self::CyclicGraph { .. } => ErrorCode::CycleDetected,
            Self::DistanceOverflow { .. } => ErrorCode::DistanceOverflow,
        }
    }
}

/// Machine-readable error codes for scripting against the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidVertex,
    NonFiniteWeight,
    ComponentsMismatch,
    CycleDetected,
    DistanceOverflow,
    GraphFileInvalid,
    ConfigParseError,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidVertex => "E1001",
            Self::NonFiniteWeight => "E1002",
            Self::ComponentsMismatch => "E2001",
            Self::CycleDetected => "E2002",
            Self::DistanceOverflow => "E2003",
            Self::GraphFileInvalid => "E3001",
            Self::ConfigParseError => "E3002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidVertex => "Vertex out of range",
            Self::NonFiniteWeight => "Edge weight is not finite",
            Self::ComponentsMismatch => "Components do not match graph",
            Self::CycleDetected => "Graph contains a cycle",
            Self::DistanceOverflow => "Path distance overflowed",
            Self::GraphFileInvalid => "Graph file is invalid",
            Self::ConfigParseError => "Config file parse error",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidVertex => Some("Vertex ids must lie in [0, vertices)."),
            Self::NonFiniteWeight => Some("Use finite numeric weights; omit the field for 1.0."),
            Self::ComponentsMismatch => {
                Some("Run SCC detection on the same graph before condensing it.")
            }
            Self::CycleDetected => Some("Condense the graph first; path queries need a DAG."),
            Self::DistanceOverflow => Some("Scale edge weights down so path sums stay finite."),
            Self::GraphFileInvalid => {
                Some("Expected {\"vertices\": n, \"edges\": [{\"from\", \"to\", \"weight\"?}]}.")
            }
            Self::ConfigParseError => Some("Fix syntax in critpath.toml and retry."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
