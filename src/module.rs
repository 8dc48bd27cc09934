//! Dynamic library (DLL) loading.
//!
//! Used to resolve the `user32.dll` entry points and to obtain the module
//! instance handle that window classes and dialogs are registered against.

use crate::error::{Error, Result};
use crate::string::WideString;
use windows::core::PCSTR;
use windows::Win32::Foundation::{FreeLibrary, HINSTANCE, HMODULE};
use windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress, LoadLibraryW};

/// A loaded dynamic library (DLL).
#[derive(Debug)]
pub struct Library {
    handle: HMODULE,
    owned: bool,
}

impl Library {
    /// Loads a library by name or path, adding a reference to it.
    pub fn load(name: &str) -> Result<Self> {
        let name_wide = WideString::new(name);

        // SAFETY: name_wide is a valid null-terminated wide string.
        let handle = unsafe { LoadLibraryW(name_wide.as_pcwstr())? };

        Ok(Self {
            handle,
            owned: true,
        })
    }

    /// Gets a handle to an already-loaded library without adding a reference.
    pub fn get(name: &str) -> Result<Self> {
        let name_wide = WideString::new(name);

        // SAFETY: name_wide is a valid null-terminated wide string.
        let handle = unsafe { GetModuleHandleW(name_wide.as_pcwstr())? };

        Ok(Self {
            handle,
            owned: false,
        })
    }

    /// Gets a handle to the current executable.
    pub fn current() -> Result<Self> {
        // SAFETY: GetModuleHandleW with NULL returns the current module.
        let handle = unsafe { GetModuleHandleW(None)? };

        Ok(Self {
            handle,
            owned: false,
        })
    }

    /// Resolves an exported function.
    ///
    /// # Safety
    ///
    /// `F` must be a function pointer type whose signature and calling
    /// convention match the export.
    pub unsafe fn get_proc<F>(&self, name: &str) -> Result<F>
    where
        F: Copy,
    {
        debug_assert_eq!(
            std::mem::size_of::<F>(),
            std::mem::size_of::<unsafe extern "system" fn() -> isize>()
        );

        let name_cstr = std::ffi::CString::new(name)
            .map_err(|_| Error::entry_point(name, "name contains a null byte"))?;

        match GetProcAddress(self.handle, PCSTR(name_cstr.as_ptr() as *const u8)) {
            Some(p) => Ok(std::mem::transmute_copy(&p)),
            None => Err(Error::entry_point(name, crate::error::last_error().to_string())),
        }
    }

    /// Returns the raw module handle.
    #[inline]
    pub fn as_raw(&self) -> HMODULE {
        self.handle
    }

    /// Returns the module handle as an instance handle.
    #[inline]
    pub fn instance(&self) -> HINSTANCE {
        self.handle.into()
    }

    /// Consumes the library without releasing it, keeping it loaded for the
    /// rest of the process.
    pub fn into_raw(self) -> HMODULE {
        let handle = self.handle;
        std::mem::forget(self);
        handle
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        if self.owned {
            // SAFETY: we hold a reference obtained from LoadLibraryW.
            unsafe {
                let _ = FreeLibrary(self.handle);
            }
        }
    }
}

/// Returns the instance handle of the current executable.
pub fn current_instance() -> Result<HINSTANCE> {
    Ok(Library::current()?.instance())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_module() {
        let module = Library::current().unwrap();
        assert!(!module.as_raw().0.is_null());
        assert!(!current_instance().unwrap().0.is_null());
    }

    #[test]
    fn test_get_proc() {
        let user32 = Library::load("user32.dll").unwrap();

        type GetSystemMetricsFn = unsafe extern "system" fn(i32) -> i32;
        let metrics: GetSystemMetricsFn = unsafe { user32.get_proc("GetSystemMetrics").unwrap() };

        // SM_CXSCREEN
        assert!(unsafe { metrics(0) } > 0);
    }

    #[test]
    fn test_missing_proc_is_entry_point_error() {
        let user32 = Library::load("user32.dll").unwrap();
        type AnyFn = unsafe extern "system" fn() -> isize;
        let err = unsafe { user32.get_proc::<AnyFn>("NoSuchExportW") }.unwrap_err();
        assert!(matches!(err, Error::EntryPoint { .. }));
    }
}
