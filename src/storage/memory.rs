use super::ObjectTableStore;
use anyhow::Result;
use opendal::Operator;

impl ObjectTableStore {
    /// Tables held in process memory; nothing survives the process
    pub fn memory() -> Result<Self> {
        use opendal::services::Memory;

        let operator = Operator::new(Memory::default())?.finish();
        Ok(Self::new(operator, "memory://".to_string()))
    }
}
