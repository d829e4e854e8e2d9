use thiserror::Error;

pub type Result<T> = std::result::Result<T, TreeError>;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("learning set is empty")]
    EmptyLearningSet,

    #[error("attribute set is empty")]
    EmptyAttributeSet,

    #[error("attribute '{0}' appears more than once")]
    DuplicateAttribute(String),

    #[error("negative weight: {0}")]
    NegativeWeight(f64),

    #[error("{name} must be >= 0 (got {value})")]
    NegativeThreshold { name: &'static str, value: f64 },

    #[error("item has {found} values, attribute set has {expected} attributes")]
    IncompatibleItem { expected: usize, found: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("attribute '{attribute}' expects a {expected} value")]
    ValueKindMismatch {
        attribute: String,
        expected: &'static str,
    },

    #[error("cannot perform test on unknown value of '{0}'")]
    UnknownValue(String),

    #[error("symbolic code {code} is outside the domain of '{attribute}' ({num_of_values} values)")]
    SymbolicValueOutOfDomain {
        attribute: String,
        code: usize,
        num_of_values: usize,
    },

    #[error("attribute '{0}' is not symbolic")]
    NotSymbolic(String),

    #[error("{0} node has no sons")]
    NoSons(&'static str),

    #[error("node {son} is not a son of node {father}")]
    NotASon { father: usize, son: usize },

    #[error("no open node left")]
    NoOpenNode,

    #[error("open node found while exploring tree")]
    OpenNodeReached,

    #[error("a learning node can only be replaced by another learning node")]
    NotALearningNode,

    #[error("invalid issue number {0}")]
    InvalidIssue(usize),

    #[error("malformed node array: {0}")]
    MalformedNodeArray(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
