//! Unit tests for the service registry context.
