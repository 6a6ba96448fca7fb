// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boilerplate macros used across the workspace crates.

/// `Display` for an enum as a fixed string per variant. Variants with
/// fields are written with `(..)` or `{ .. }`.
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident $(( $($ignore:tt)* ))? $({ $($ignore_named:tt)* })? => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant $(( $($ignore)* ))? $({ $($ignore_named)* })? => $str, )+
                })
            }
        }
    };
}

/// Test-only builder for a plain data struct.
///
/// Expands to `$builder` with one setter per field, `Default` from the
/// listed defaults, and `$target::builder()`. Every item is compiled only
/// under `test` or the `test-support` feature. `into` fields take
/// `impl Into<T>`; `set` fields take `T`.
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            $(into {
                $( $into_field:ident : $into_ty:ty = $into_default:expr ),* $(,)?
            })?
            $(set {
                $( $set_field:ident : $set_ty:ty = $set_default:expr ),* $(,)?
            })?
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            $($( $into_field: $into_ty, )*)?
            $($( $set_field: $set_ty, )*)?
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self {
                    $($( $into_field: $into_default.into(), )*)?
                    $($( $set_field: $set_default, )*)?
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $crate::setters! {
                $(into { $( $into_field: $into_ty ),* })?
                $(set { $( $set_field: $set_ty ),* })?
            }

            pub fn build(self) -> $target {
                $target {
                    $($( $into_field: self.$into_field, )*)?
                    $($( $set_field: self.$set_field, )*)?
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}

/// By-value setters for builder and config structs, expanded inside an
/// `impl` block. `option` fields are `Option<T>` and the setter wraps the
/// argument in `Some`.
///
/// ```ignore
/// impl RunnerBuilder {
///     vg_core::setters! {
///         into { id: RunnerId }
///         set { by_id_only: bool }
///         option { workdir: PathBuf }
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    (
        $(into {
            $( $into_field:ident : $into_ty:ty ),* $(,)?
        })?
        $(set {
            $( $set_field:ident : $set_ty:ty ),* $(,)?
        })?
        $(option {
            $( $opt_field:ident : $opt_ty:ty ),* $(,)?
        })?
    ) => {
        $($(
            pub fn $into_field(mut self, v: impl Into<$into_ty>) -> Self {
                self.$into_field = v.into();
                self
            }
        )*)?

        $($(
            pub fn $set_field(mut self, v: $set_ty) -> Self {
                self.$set_field = v;
                self
            }
        )*)?

        $($(
            pub fn $opt_field(mut self, v: impl Into<$opt_ty>) -> Self {
                self.$opt_field = Some(v.into());
                self
            }
        )*)?
    };
}
