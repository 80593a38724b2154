/// Generates chainable setters for `Option<T>` request fields.
macro_rules! impl_builder_methods {
    ($builder:ident, $($field:ident: $field_type:ty),* $(,)?) => {
        impl $builder {
            $(
                pub fn $field(mut self, $field: $field_type) -> Self {
                    self.$field = Some($field);
                    self
                }
            )*
        }
    };
}

pub(crate) use impl_builder_methods;
