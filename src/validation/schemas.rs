use once_cell::sync::Lazy;

use super::{Field, Format, Schema};

pub static REGISTER: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(Field::string("username").required().min_length(3).max_length(30))
        .field(Field::string("password").required().min_length(6).max_length(72))
        .field(Field::string("email").min_length(6).max_length(60))
        .field(Field::string("first_name").max_length(30))
        .field(Field::string("last_name").max_length(30))
        .field(Field::string("bio").max_length(500))
});

pub static LOGIN: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(Field::string("username").required())
        .field(Field::string("password").required())
});

pub static USER_UPDATE: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(Field::string("email").max_length(60))
        .field(Field::string("first_name").max_length(30))
        .field(Field::string("last_name").max_length(30))
        .field(Field::string("bio").max_length(500))
        .field(Field::string("password").max_length(72))
});

pub static READ_NEW: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(Field::string("title").required().min_length(1).max_length(300))
        .field(Field::string("description").max_length(5000))
        .field(Field::string("isbn").required().min_length(1).max_length(20))
        .field(Field::number("avg_rating").minimum(0).maximum(5))
        .field(Field::string("print_type").max_length(50))
        .field(Field::string("publisher").max_length(200))
        .field(Field::integer("pages").minimum(0).maximum(100_000))
        .field(Field::string("thumbnail").max_length(2000))
        .field(Field::string_array("authors"))
});

pub static USER_READ_NEW: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(Field::integer("read_id").required().minimum(1))
        .field(Field::integer("rating").minimum(1).maximum(5))
        .field(Field::string("review_text").max_length(5000))
        .field(Field::string("review_date").format(Format::Date))
});

pub static USER_READ_UPDATE: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(Field::integer("rating").minimum(1).maximum(5))
        .field(Field::string("review_text").max_length(5000))
        .field(Field::string("review_date").format(Format::Date))
});

pub static COLLECTION_NEW: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(Field::string("name").required().min_length(1).max_length(50))
        .field(Field::string("description").max_length(500))
});

pub static COLLECTION_UPDATE: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(Field::string("name").max_length(50))
        .field(Field::string("description").max_length(500))
});

pub static COLLECTION_READ_NEW: Lazy<Schema> = Lazy::new(|| {
    Schema::new().field(Field::integer("read_id").required().minimum(1))
});

pub static JOURNAL_NEW: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(Field::string("title").required().min_length(1).max_length(100))
        .field(Field::string("text").required().min_length(1).max_length(20_000))
});

pub static JOURNAL_UPDATE: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(Field::string("title").max_length(100))
        .field(Field::string("text").max_length(20_000))
});

pub static FOLLOW_NEW: Lazy<Schema> = Lazy::new(|| {
    Schema::new().field(Field::integer("followed_id").required().minimum(1))
});

pub static RECOMMENDATION_NEW: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(Field::integer("receiver_id").required().minimum(1))
        .field(Field::integer("read_id").required().minimum(1))
        .field(Field::string("content").required().min_length(1).max_length(1000))
});

pub static RECOMMENDATION_UPDATE: Lazy<Schema> = Lazy::new(|| {
    Schema::new().field(Field::string("content").max_length(1000))
});

pub static BADGE_AWARD: Lazy<Schema> = Lazy::new(|| {
    Schema::new().field(Field::integer("badge_id").required().minimum(1))
});
