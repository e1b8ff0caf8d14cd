//! Tests against a mocked backend

pub mod stream_mock_tests;
