pub mod range;
pub mod unit;

/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, logs the elapsed time under the given label, and evaluates to
/// the value of the expression.
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        $crate::timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!($log_level, "{} took {} ms", $label, elapsed.as_millis());
        value
    }};
}

/// Allocate an empty vector that can hold exactly `len` elements, returning an
/// error instead of aborting if the allocation fails. Every lookup table and
/// pixel buffer goes through here, so that running out of memory while
/// building a large grid is reported to the caller.
pub fn try_alloc<T>(len: usize, what: &str) -> anyhow::Result<Vec<T>> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(len).map_err(|err| {
        anyhow::anyhow!(
            "failed to allocate {} ({} elements of {} bytes): {}",
            what,
            len,
            std::mem::size_of::<T>(),
            err
        )
    })?;
    Ok(vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_alloc() {
        let vec: Vec<u32> = try_alloc(100, "test table").unwrap();
        assert!(vec.is_empty());
        assert!(vec.capacity() >= 100);

        // Way more than any machine could hold
        let err = try_alloc::<u64>(usize::MAX / 4, "huge table").unwrap_err();
        assert!(err.to_string().contains("huge table"), "{}", err);
    }
}
