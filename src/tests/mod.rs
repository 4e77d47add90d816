mod fixtures;
mod property_tests;
mod test_discord;
