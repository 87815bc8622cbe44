//! Row to entity mappers

mod user_record;
