/// A compiled program: one void, zero-argument procedure made of an ordered
/// statement sequence. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// The closed set of statement forms the dialect supports.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Loop(LoopStmt),
    Print(PrintStmt),
}

/// A counting loop. `step` is taken as-is and never validated: zero, or a
/// step that moves away from `bound`, loops forever.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopStmt {
    pub counter_name: String,
    pub init_value: i64,
    pub bound: i64,
    pub step: i64,
    pub body: Vec<Statement>,
}

/// Emits a literal line of text. No interpolation, no escaping.
#[derive(Clone, Debug, PartialEq)]
pub struct PrintStmt {
    pub value: String,
}
