use crate::fs::NodeId;

/// Stato di selezione di un canale logico (validity area)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    selected_df: Option<NodeId>,
    selected_ef: Option<NodeId>,
    current_record: u8,
    current_offset: u16,
}

impl SelectionState {
    pub fn selected_df(&self) -> Option<NodeId> {
        self.selected_df
    }

    pub fn selected_ef(&self) -> Option<NodeId> {
        self.selected_ef
    }

    /// EF se presente, altrimenti la DF
    pub fn selected(&self) -> Option<NodeId> {
        self.selected_ef.or(self.selected_df)
    }

    pub fn current_record(&self) -> u8 {
        self.current_record
    }

    pub fn current_offset(&self) -> u16 {
        self.current_offset
    }

    pub fn select_directory(&mut self, df: NodeId) {
        self.current_record = 0;
        self.current_offset = 0;
        self.selected_ef = None;
        self.selected_df = Some(df);
    }

    pub fn select_elementary(&mut self, ef: NodeId, parent: NodeId) {
        self.current_record = 0;
        self.current_offset = 0;
        self.selected_ef = Some(ef);
        self.selected_df = Some(parent);
    }

    /// Invocato alla deselezione del canale
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
