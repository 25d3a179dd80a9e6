/// Generates getters that return `[T]` fields as an `Array1<T>`.
#[macro_export]
macro_rules! array1D_getter_impl {
    ($fun_name:ident, $($field:ident).+) => {
        #[doc = "Returns the `"]
        #[doc = stringify!($($field).+)]
        #[doc = "` array." ]
        pub fn $fun_name(&self) -> Array1<f64> {
            Array1::from(self.$($field).+.clone())
        }
    }
}

/// Generates getters that return `Vec<Vec<T>>` fields as a NaN-padded
/// rectangular `Array2<T>`, wide enough for the longest row.
#[macro_export]
macro_rules! array2D_getter_impl {
    ($fun_name:ident, $field:ident) => {
        #[doc = "Returns the `"]
        #[doc = stringify!($field)]
        #[doc = "` rows, padded with NaN to a rectangular 2D array." ]
        pub fn $fun_name(&self) -> Array2<f64> {
            let columns = self.$field.iter().map(Vec::len).max().unwrap_or(0);
            Array2::from_shape_fn((self.$field.len(), columns), |(i, j)| {
                self.$field[i].get(j).copied().unwrap_or(f64::NAN)
            })
        }
    }
}
