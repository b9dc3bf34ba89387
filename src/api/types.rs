use serde::Serialize;
use std::ffi::CString;
use std::fmt::Display;
use std::os::raw::c_char;

#[repr(C)]
pub struct ApiResult {
    pub success: u8,
    pub data: *mut c_char,
    pub error: *mut c_char,
}

fn into_c_string(text: String, fallback: &str) -> *mut c_char {
    CString::new(text)
        .or_else(|_| CString::new(fallback))
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

impl ApiResult {
    pub fn success(data: String) -> Self {
        Self {
            success: 1,
            data: into_c_string(data, "Data contains invalid characters"),
            error: std::ptr::null_mut(),
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            success: 0,
            data: std::ptr::null_mut(),
            error: into_c_string(error, "Error message contains invalid characters"),
        }
    }

    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) => Self::success(json),
            Err(e) => Self::error(format!("Failed to serialize response: {}", e)),
        }
    }

    pub fn from_result<T: Serialize, E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::json(&value),
            Err(e) => Self::error(e.to_string()),
        }
    }

    pub fn into_raw(self) -> *mut ApiResult {
        Box::into_raw(Box::new(self))
    }
}
