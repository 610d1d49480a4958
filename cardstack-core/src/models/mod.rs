mod card_side;
mod page;

pub use card_side::{CardSide, ParseCardSideError};
pub use page::{Document, PageRecord};
