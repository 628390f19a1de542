use serde::{Deserialize, Serialize};

/// General purpose registers in the order they were first referenced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSet(Vec<u8>);

impl RegisterSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Records `reg` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, reg: u8) -> bool {
        if self.contains(reg) {
            return false;
        }
        self.0.push(reg);
        true
    }

    pub fn contains(&self, reg: u8) -> bool {
        self.0.contains(&reg)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `r<N>` names, first-seen order
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|reg| format!("r{}", reg)).collect()
    }
}

/// A finalized interrupt service routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineRecord {
    /// Raw label text, e.g. `__vector_17`
    pub name: String,
    /// Index parsed from the label suffix
    pub vector_index: u32,
    /// Address of the routine label
    pub start_address: u64,
    /// Address of the last instruction seen before the boundary
    pub last_instruction_address: Option<u64>,
    pub instruction_count: usize,
    /// `None` when the routine had no instructions
    pub size_bytes: Option<u64>,
    pub push_count: usize,
    pub pop_count: usize,
    pub registers_used: RegisterSet,
    /// Push and pop counts differ
    pub balance_issue: bool,
    pub cycle_estimate: Option<u64>,
    pub execution_time_us: Option<f64>,
}

impl RoutineRecord {
    pub fn is_empty(&self) -> bool {
        self.instruction_count == 0
    }
}
