/// Parallel map: apply `$f` to each element of `$slice`, collecting into a Vec.
macro_rules! par_map {
    ($slice:expr, $f:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
            $slice.par_iter().map($f).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            $slice.iter().map($f).collect()
        }
    }};
}

/// Run two closures, concurrently when `$parallel` is set and the feature is on.
/// Returns both results as a tuple.
macro_rules! par_join {
    ($parallel:expr, $a:expr, $b:expr) => {{
        #[cfg(feature = "parallel")]
        {
            if $parallel {
                rayon::join($a, $b)
            } else {
                (($a)(), ($b)())
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            let _ = $parallel;
            (($a)(), ($b)())
        }
    }};
}
