//! Unit test modules.

mod heart_rate_decoder_test;
