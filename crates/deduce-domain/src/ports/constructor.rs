//! Constructors
//!
//! A [`Constructor`] records the parameter types of one way of building a
//! concrete type and knows how to invoke it with already resolved arguments.
//! Typed registration goes through [`Factory`], implemented for every
//! function or closure whose parameters are `Arc<A>` handles (up to
//! [`MAX_CONSTRUCTOR_ARITY`](crate::constants::MAX_CONSTRUCTOR_ARITY)).

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::ports::descriptor::{Instance, TypeKey, Visibility, downcast, erase};

/// Callable that builds a `T` from resolved arguments
///
/// `Args` is a tuple of `Arc<A>` handles naming the parameter types. It only
/// exists to keep the per-arity implementations apart.
pub trait Factory<T, Args>: Send + Sync + 'static {
    /// Parameter types in declared order
    fn params() -> Vec<TypeKey>;

    /// Invoke with type-erased arguments in declared order
    fn call(&self, args: &[Instance]) -> Result<T>;
}

fn next_arg<'a, A, I>(args: &mut I, position: usize) -> Result<Arc<A>>
where
    A: ?Sized + Send + Sync + 'static,
    I: Iterator<Item = &'a Instance>,
{
    let instance = args.next().ok_or_else(|| {
        Error::invalid_argument(format!("missing argument {position} ({})", type_name::<A>()))
    })?;
    downcast::<A>(instance).ok_or_else(|| {
        Error::invalid_argument(format!(
            "argument {position} is not an instance of {}",
            type_name::<A>()
        ))
    })
}

macro_rules! impl_factory {
    ($($arg:ident),*) => {
        impl<F, T, $($arg,)*> Factory<T, ($(Arc<$arg>,)*)> for F
        where
            F: Fn($(Arc<$arg>),*) -> T + Send + Sync + 'static,
            $($arg: ?Sized + Send + Sync + 'static,)*
        {
            fn params() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn call(&self, args: &[Instance]) -> Result<T> {
                let mut iter = args.iter();
                let mut position = 0usize;
                $(
                    let $arg = next_arg::<$arg, _>(&mut iter, position)?;
                    position += 1;
                )*
                Ok((self)($($arg),*))
            }
        }
    };
}

impl_factory!();
impl_factory!(A1);
impl_factory!(A1, A2);
impl_factory!(A1, A2, A3);
impl_factory!(A1, A2, A3, A4);
impl_factory!(A1, A2, A3, A4, A5);
impl_factory!(A1, A2, A3, A4, A5, A6);

type Invoke = Arc<dyn Fn(&[Instance]) -> Result<Instance> + Send + Sync>;

/// One way of constructing a concrete type
#[derive(Clone)]
pub struct Constructor {
    visibility: Visibility,
    params: Vec<TypeKey>,
    invoke: Invoke,
}

impl Constructor {
    /// Wrap a typed factory
    pub fn new<T, Args, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Factory<T, Args>,
    {
        Self {
            visibility: Visibility::Public,
            params: F::params(),
            invoke: Arc::new(move |args: &[Instance]| {
                factory.call(args).map(|value| erase(Arc::new(value)))
            }),
        }
    }

    /// Hide this constructor from auto-wiring
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Internal;
        self
    }

    /// Whether auto-wiring may use this constructor
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Parameter types in declared order
    pub fn params(&self) -> &[TypeKey] {
        &self.params
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Invoke with resolved arguments in declared order
    pub fn invoke(&self, args: &[Instance]) -> Result<Instance> {
        if args.len() != self.params.len() {
            return Err(Error::invalid_argument(format!(
                "constructor expects {} arguments, got {}",
                self.params.len(),
                args.len()
            )));
        }
        (self.invoke)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("visibility", &self.visibility)
            .field("params", &self.params)
            .finish()
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.short_name())?;
        }
        write!(f, ")")
    }
}
