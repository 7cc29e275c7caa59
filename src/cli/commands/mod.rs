pub mod inspect;
pub mod lookup;
