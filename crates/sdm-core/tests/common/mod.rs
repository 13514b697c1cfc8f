pub mod fake_steam;
