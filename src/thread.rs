//! OS thread identification, used to stamp the thread that services an
//! execution context.

#[inline]
pub fn current_id() -> usize {
    __current_id()
}

#[cfg(unix)]
#[inline]
fn __current_id() -> usize {
    unsafe { libc::pthread_self() as usize }
}

#[cfg(not(unix))]
#[inline]
fn __current_id() -> usize {
    0
}
