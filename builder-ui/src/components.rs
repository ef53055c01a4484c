mod add_blocks_dialog;
mod block_picker;
mod save_status;

pub use add_blocks_dialog::AddBlocksDialog;
pub use block_picker::BlockPicker;
pub use save_status::{save_state_label, SaveStatusIndicator};
