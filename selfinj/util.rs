/// Build a [`crate::quiver::Path`] from a non-empty list of vertices.
///
/// ```
/// use selfinj::path;
///
/// let p = path![1, 2, 3];
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! path {
    ( $( $x:expr ),+ $(,)? ) => {
        $crate::quiver::Path::from_vertices_unchecked(vec![$( $x ),+])
    };
}
