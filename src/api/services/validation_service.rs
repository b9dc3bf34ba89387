use serde::de::DeserializeOwned;
use std::ffi::CStr;
use std::os::raw::c_char;

use crate::api::types::ApiResult;

pub fn parse_c_string(ptr: *const c_char, field_name: &str) -> Result<String, *mut ApiResult> {
    if ptr.is_null() {
        return Err(ApiResult::error(format!("{} is null", field_name)).into_raw());
    }

    // Safety: the host passes a NUL-terminated string that outlives this call.
    let raw = unsafe { CStr::from_ptr(ptr) };
    raw.to_str()
        .map(str::to_string)
        .map_err(|_| ApiResult::error(format!("Invalid UTF-8 string for {}", field_name)).into_raw())
}

pub fn parse_optional_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }

    unsafe { CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string()) }
}

pub fn parse_json_arg<T: DeserializeOwned>(ptr: *const c_char, field_name: &str) -> Result<T, *mut ApiResult> {
    let text = parse_c_string(ptr, field_name)?;
    serde_json::from_str(&text)
        .map_err(|e| ApiResult::error(format!("Failed to parse {}: {}", field_name, e)).into_raw())
}
