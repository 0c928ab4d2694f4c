//! Core [`Optional`] container and its combinators.

use std::{fmt, iter::FusedIterator};

/// Container that either holds a value (is *present*) or holds nothing (is *absent*).
///
/// `Optional` is a plain value: it is [`Copy`] / [`Clone`] whenever the payload is, and read-only combinators
/// consume it by value. Only the in-place family ([`insert()`](Self::insert), [`get_or_insert()`](Self::get_or_insert)
/// and its siblings, [`take()`](Self::take), [`take_if()`](Self::take_if), [`replace()`](Self::replace))
/// mutate a container through a mutable reference.
///
/// An absent container carries no payload, so two absent containers of the same type are always equal
/// regardless of what they held before.
///
/// # Examples
///
/// ```
/// use optional_value::Optional;
///
/// let mut port = Optional::present(8080_u16);
/// assert!(port.is_present_and(|&port| port > 1024));
/// assert_eq!(port.map(|port| port + 1), Optional::present(8081));
///
/// let taken = port.take();
/// assert_eq!(taken, Optional::present(8080));
/// assert!(port.is_absent());
/// assert_eq!(port.unwrap_or(80), 80);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Optional<T> {
    inner: Option<T>,
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<T: fmt::Debug> fmt::Debug for Optional<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(value) => formatter.debug_tuple("Present").field(value).finish(),
            None => formatter.write_str("Absent"),
        }
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        Self { inner: value }
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.inner
    }
}

/// Construction and inspection.
impl<T> Optional<T> {
    /// Creates a present container holding `value`.
    pub const fn present(value: T) -> Self {
        Self { inner: Some(value) }
    }

    /// Creates an absent container.
    pub const fn absent() -> Self {
        Self { inner: None }
    }

    /// Checks whether this container holds a value.
    pub const fn is_present(&self) -> bool {
        self.inner.is_some()
    }

    /// Checks whether this container is empty.
    pub const fn is_absent(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns `true` if the container is present and the payload satisfies `predicate`.
    /// `predicate` is not called for an absent container.
    pub fn is_present_and(&self, predicate: impl FnOnce(&T) -> bool) -> bool {
        match &self.inner {
            Some(value) => predicate(value),
            None => false,
        }
    }

    /// Returns `true` if the container is absent, or if the payload satisfies `predicate`.
    pub fn is_absent_or(&self, predicate: impl FnOnce(&T) -> bool) -> bool {
        match &self.inner {
            Some(value) => predicate(value),
            None => true,
        }
    }

    /// Borrows the payload, if any.
    pub const fn get(&self) -> Option<&T> {
        self.inner.as_ref()
    }

    /// Converts `&Optional<T>` into `Optional<&T>`.
    pub const fn as_ref(&self) -> Optional<&T> {
        Optional {
            inner: self.inner.as_ref(),
        }
    }

    /// Converts `&mut Optional<T>` into `Optional<&mut T>`.
    pub fn as_mut(&mut self) -> Optional<&mut T> {
        Optional {
            inner: self.inner.as_mut(),
        }
    }

    /// Converts this container into a standard [`Option`].
    pub fn into_option(self) -> Option<T> {
        self.inner
    }

    /// Returns an iterator over the payload (yields at most one item).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.inner.as_ref(),
        }
    }
}

/// Extraction.
impl<T> Optional<T> {
    /// Returns the payload.
    ///
    /// # Panics
    ///
    /// Panics with `message` if the container is absent. Use this only when absence is a logic error
    /// on the caller's side.
    #[track_caller]
    pub fn expect(self, message: &str) -> T {
        match self.inner {
            Some(value) => value,
            None => panic!("{message}"),
        }
    }

    /// Returns the payload.
    ///
    /// # Panics
    ///
    /// Panics if the container is absent.
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self.inner {
            Some(value) => value,
            None => panic!("called `Optional::unwrap()` on an absent value"),
        }
    }

    /// Returns the payload, or `default` if the container is absent.
    pub fn unwrap_or(self, default: T) -> T {
        match self.inner {
            Some(value) => value,
            None => default,
        }
    }

    /// Returns the payload, or computes a fallback. `fallback` is only called if the container is absent.
    pub fn unwrap_or_else(self, fallback: impl FnOnce() -> T) -> T {
        match self.inner {
            Some(value) => value,
            None => fallback(),
        }
    }

    /// Returns the payload, or the default value of `T` if the container is absent.
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.unwrap_or_else(T::default)
    }

    /// Converts this container into a `Result`, mapping absence to `Err(err)`.
    #[allow(clippy::missing_errors_doc)] // the error is supplied by the caller
    pub fn ok_or<E>(self, err: E) -> Result<T, E> {
        match self.inner {
            Some(value) => Ok(value),
            None => Err(err),
        }
    }

    /// Converts this container into a `Result`. The error is only constructed if the container is absent.
    #[allow(clippy::missing_errors_doc)] // the error is supplied by the caller
    pub fn ok_or_else<E>(self, err: impl FnOnce() -> E) -> Result<T, E> {
        match self.inner {
            Some(value) => Ok(value),
            None => Err(err()),
        }
    }
}

/// Transformation.
impl<T> Optional<T> {
    /// Maps the payload with `map_fn`; absence is propagated without calling it.
    pub fn map<U>(self, map_fn: impl FnOnce(T) -> U) -> Optional<U> {
        match self.inner {
            Some(value) => Optional::present(map_fn(value)),
            None => Optional::absent(),
        }
    }

    /// Maps the payload with `map_fn`, or returns `default` if the container is absent.
    pub fn map_or<U>(self, default: U, map_fn: impl FnOnce(T) -> U) -> U {
        match self.inner {
            Some(value) => map_fn(value),
            None => default,
        }
    }

    /// Maps the payload with `map_fn`, or computes a fallback with `default_fn` if the container is absent.
    pub fn map_or_else<U>(
        self,
        default_fn: impl FnOnce() -> U,
        map_fn: impl FnOnce(T) -> U,
    ) -> U {
        match self.inner {
            Some(value) => map_fn(value),
            None => default_fn(),
        }
    }

    /// Chains a step that may itself produce an absent container.
    pub fn and_then<U>(self, step: impl FnOnce(T) -> Optional<U>) -> Optional<U> {
        match self.inner {
            Some(value) => step(value),
            None => Optional::absent(),
        }
    }

    /// Returns `other` if both containers are present; otherwise, returns an absent container.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self.inner, other.inner) {
            (Some(_), Some(value)) => Self::present(value),
            _ => Self::absent(),
        }
    }

    /// Keeps the payload only if it satisfies `predicate`.
    #[must_use]
    pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
        Self {
            inner: self.inner.filter(predicate),
        }
    }

    /// Returns the payload, or `fallback` if the container is absent.
    ///
    /// Unlike [`and()`](Self::and) and [`xor()`](Self::xor), this returns a plain value rather than a container.
    pub fn or(self, fallback: T) -> T {
        self.unwrap_or(fallback)
    }

    /// Returns the payload, or computes a fallback if the container is absent.
    pub fn or_else(self, fallback: impl FnOnce() -> T) -> T {
        self.unwrap_or_else(fallback)
    }

    /// Returns whichever container is present if exactly one of them is; otherwise, returns an absent container.
    #[must_use]
    pub fn xor(self, other: Self) -> Self {
        match (self.inner, other.inner) {
            (Some(value), None) | (None, Some(value)) => Self::present(value),
            _ => Self::absent(),
        }
    }

    /// Calls `inspect_fn` on the payload if the container is present.
    pub fn inspect(&self, inspect_fn: impl FnOnce(&T)) {
        if let Some(value) = &self.inner {
            inspect_fn(value);
        }
    }
}

impl<T> Optional<Optional<T>> {
    /// Removes one level of nesting. Both an absent outer and an absent inner container produce an absent result.
    pub fn flatten(self) -> Optional<T> {
        self.inner.unwrap_or_default()
    }
}

/// In-place mutation.
impl<T> Optional<T> {
    /// Stores `value` unconditionally and returns a reference to it. A previously held value is dropped.
    pub fn insert(&mut self, value: T) -> &mut T {
        self.inner.insert(value)
    }

    /// Returns a reference to the payload, storing `value` first if the container is absent.
    pub fn get_or_insert(&mut self, value: T) -> &mut T {
        self.inner.get_or_insert(value)
    }

    /// Returns a reference to the payload, storing the default value of `T` first if the container is absent.
    pub fn get_or_insert_default(&mut self) -> &mut T
    where
        T: Default,
    {
        self.get_or_insert_with(T::default)
    }

    /// Returns a reference to the payload, storing the output of `init` first if the container is absent.
    /// `init` is only called if the container is absent.
    pub fn get_or_insert_with(&mut self, init: impl FnOnce() -> T) -> &mut T {
        self.inner.get_or_insert_with(init)
    }

    /// Moves the payload out, leaving this container absent.
    #[must_use = "use `Optional::replace()` or assignment if the previous value is not needed"]
    pub fn take(&mut self) -> Self {
        Self {
            inner: self.inner.take(),
        }
    }

    /// Moves the payload out if it satisfies `predicate`. If the container is absent or the predicate fails,
    /// returns an absent container and leaves `self` untouched.
    #[must_use]
    pub fn take_if(&mut self, predicate: impl FnOnce(&T) -> bool) -> Self {
        if self.is_present_and(predicate) {
            self.take()
        } else {
            Self::absent()
        }
    }

    /// Stores `value` and returns the previously held payload (absent if there was none).
    pub fn replace(&mut self, value: T) -> Self {
        Self {
            inner: self.inner.replace(value),
        }
    }
}

/// Iterator over the payload of an [`Optional`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: Option<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = usize::from(self.inner.is_some());
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a Optional<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for Optional<T> {
    type Item = T;
    type IntoIter = std::option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}
