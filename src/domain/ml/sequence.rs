use super::feature_row::CleanRow;

/// One flattened lag window and its one-step-ahead label.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    /// `FEATURE_COUNT * sequence_length` values, grouped by feature then lag.
    pub inputs: Vec<f64>,
    /// Close of the clean row immediately after the window.
    pub label: f64,
}

/// Output of the sequence builder for one feature table.
#[derive(Debug, Clone)]
pub struct SequenceSet {
    pub feature_names: Vec<String>,
    pub sequence_length: usize,
    pub sequences: Vec<Sequence>,
    /// Rows that survived the undefined-value filter, in time order.
    pub clean_rows: Vec<CleanRow>,
}

impl SequenceSet {
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn inputs(&self) -> Vec<Vec<f64>> {
        self.sequences.iter().map(|s| s.inputs.clone()).collect()
    }

    pub fn targets(&self) -> Vec<f64> {
        self.sequences.iter().map(|s| s.label).collect()
    }

    /// Most recent window; the one used for inference.
    pub fn last(&self) -> Option<&Sequence> {
        self.sequences.last()
    }
}
