mod batch_assembler;

pub use batch_assembler::{BatchAssembler, FlushStats};
