//! Unit tests for the module lifecycle bounded context.
