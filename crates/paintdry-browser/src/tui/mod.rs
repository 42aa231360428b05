//! Interactive terminal browser.
//!
//! ```text
//!  Resources  Observations  Changes  History  Config  Search     <- tab bar (derived from path)
//! ┌ Observations ─────────────────────────────────────────────┐
//! │   id  resource     module  attribute  value          ...  │  <- mounted view
//! │ ▶ 1   example.com  dns     A          93.184.216.34       │
//! └──────────────────────────────────────── page 1/3 · 120 ───┘
//!   /observations [Tab sections] [Alt+←→ history] [^c quit]     <- status bar
//! ```
//!
//! Fetches run on worker threads; the event loop commits their responses to
//! whichever view is mounted when they arrive.

mod app;
mod highlight;
mod input;
mod ui;

pub use app::{App, HitAreas, Toast, run};
pub use highlight::highlight_json;
pub use input::{InputChange, TextInput};
pub use ui::render;
