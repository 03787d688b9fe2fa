//! Macros for defining newtype wrappers with conversion and deref behaviors.

#[macro_export]
macro_rules! impl_basic {
    ($name: ident, $type: ty) => {
        impl core::convert::From<$type> for $name {
            fn from(value: $type) -> Self {
                $name { inner: value }
            }
        }
        impl core::convert::Into<$type> for $name {
            fn into(self) -> $type {
                self.inner
            }
        }

        impl core::ops::Deref for $name {
            type Target = $type;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl core::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.inner
            }
        }
        impl $name {
            pub const fn from_const(value: $type) -> Self {
                $name { inner: value }
            }
            pub const fn into_const(self) -> $type {
                self.inner
            }
        }
    };
}
