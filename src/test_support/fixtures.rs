//! Vendor header fixtures.
//!
//! A trimmed Level Zero header set (five traced functions, one of them behind
//! `#ifdef ZE_ENABLE_MEMORY_FILL`), the tracing-layer header declaring one
//! function without a dispatch-table slot, a hook source and a Unified
//! Runtime function-id enum.

use std::path::PathBuf;

use crate::scanner::HeaderSource;

pub const ZE_API_H: &str = include_str!("../../tests/fixtures/level_zero/ze_api.h");

pub const ZEL_TRACING_H: &str =
    include_str!("../../tests/fixtures/level_zero/layers/zel_tracing_register_cb.h");

pub const ZE_COLLECTOR_H: &str = include_str!("../../tests/fixtures/hooks/ze_collector.h");

pub const UR_API_H: &str = include_str!("../../tests/fixtures/ur/ur_api.h");

pub fn ze_api() -> HeaderSource {
    HeaderSource::from_text("ze_api.h", ZE_API_H)
}

pub fn zel_tracing() -> HeaderSource {
    HeaderSource::from_text("layers/zel_tracing_register_cb.h", ZEL_TRACING_H)
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Include directory holding `ze_api.h` and `layers/`.
pub fn level_zero_dir() -> PathBuf {
    fixtures_dir().join("level_zero")
}

pub fn hooks_file() -> PathBuf {
    fixtures_dir().join("hooks").join("ze_collector.h")
}

pub fn ur_api_file() -> PathBuf {
    fixtures_dir().join("ur").join("ur_api.h")
}
