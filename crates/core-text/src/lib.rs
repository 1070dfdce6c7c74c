//! Codepoint-oriented text primitives for the interactive console.
//!
//! Everything here models text as a sequence of Unicode scalar values
//! (`char`), never bytes and never grapheme clusters. One codepoint is one
//! column; rendering concerns beyond that live in the host.
//!
//! Exposed components:
//! - [`TextInput`]: the editable line under the cursor.
//! - [`TextLine`]: an immutable snapshot of a codepoint sequence.
//! - [`TextInputHistory`]: committed inputs plus a navigation index.
//! - [`ScrollbackBuffer`]: wrapped output history with a paging cursor.

mod history;
mod input;
mod scrollback;

pub use history::TextInputHistory;
pub use input::{TextInput, TextLine};
pub use scrollback::ScrollbackBuffer;
