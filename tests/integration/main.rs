mod helpers;
mod test_reviews;
