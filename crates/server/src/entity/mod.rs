pub mod classroom;
pub mod pmp;
pub mod question;
pub mod question_bonus_link;
pub mod question_category;
pub mod user;
