//! Shared test fixtures for the scoring engine.
