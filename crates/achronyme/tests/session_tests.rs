//! Host-boundary tests: handle lifecycle, zero-copy reads, fast-path
//! kernels, and rendering contracts.

use achronyme::{Error, Session};
use pretty_assertions::assert_eq;

#[test]
fn handle_binds_into_expressions_and_dies_with_release() {
    let mut session = Session::new();
    let handle = session.create_vector(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    session.bind("v", handle).unwrap();
    assert_eq!(session.eval("sum(v)").unwrap(), "28");

    session.release(handle).unwrap();
    // Pinned contract: a name bound to a released handle reports the dead
    // handle rather than an undefined variable.
    assert!(matches!(session.eval("sum(v)"), Err(Error::UnknownHandle(_))));
}

#[test]
fn handle_ids_are_unique_across_release() {
    let mut session = Session::new();
    let first = session.create_vector(&[1.0]);
    session.release(first).unwrap();
    let second = session.create_vector(&[1.0]);
    assert_ne!(first, second);
    assert!(matches!(session.len(first), Err(Error::UnknownHandle(_))));
}

#[test]
fn zero_copy_reads_expose_length_and_pointer() {
    let mut session = Session::new();
    let handle = session.create_vector(&[1.5, 2.5, 3.5]);
    assert_eq!(session.len(handle).unwrap(), 3);
    assert!(!session.data_ptr(handle).unwrap().is_null());
    assert_eq!(session.data(handle).unwrap(), &[1.5, 2.5, 3.5]);
}

#[test]
fn matrix_handles_bind_too() {
    let mut session = Session::new();
    let handle = session.create_matrix(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    session.bind("m", handle).unwrap();
    assert_eq!(session.eval("det(m)").unwrap(), "-2");
    assert_eq!(session.eval("trace(m)").unwrap(), "5");
}

#[test]
fn create_matrix_validates_shape() {
    let mut session = Session::new();
    assert!(session.create_matrix(2, 3, &[1.0; 5]).is_err());
    assert!(session.create_matrix(0, 3, &[]).is_err());
}

#[test]
fn binding_a_dead_handle_fails_up_front() {
    let mut session = Session::new();
    let handle = session.create_vector(&[1.0]);
    session.release(handle).unwrap();
    assert!(matches!(session.bind("v", handle), Err(Error::UnknownHandle(_))));
}

#[test]
fn fast_paths_bypass_the_parser() {
    let mut session = Session::new();
    let input = session.create_vector(&[1.0, 4.0, 9.0, 16.0]);
    let output = session.unary_fast("sqrt", input).unwrap();
    assert_eq!(session.data(output).unwrap(), &[1.0, 2.0, 3.0, 4.0]);

    // Unknown kernel names are rejected without touching the table.
    assert!(session.unary_fast("nosuchkernel", input).is_err());
}

#[test]
fn lu_fast_returns_three_live_handles() {
    let mut session = Session::new();
    let a = session.create_matrix(2, 2, &[4.0, 3.0, 6.0, 3.0]).unwrap();
    let (l, u, p) = session.lu_fast(a).unwrap();
    assert_eq!(session.len(l).unwrap(), 4);
    assert_eq!(session.len(u).unwrap(), 4);
    assert_eq!(session.len(p).unwrap(), 4);
}

#[test]
fn fft_fast_materializes_an_n_by_2_matrix() {
    let mut session = Session::new();
    let input = session.create_vector(&[1.0, 0.0, 0.0, 0.0]);
    let output = session.fft_fast(input).unwrap();
    // An impulse has a flat spectrum: every bin is 1 + 0i.
    let data = session.data(output).unwrap();
    assert_eq!(data.len(), 8);
    for bin in data.chunks(2) {
        assert!((bin[0] - 1.0).abs() < 1e-12);
        assert!(bin[1].abs() < 1e-12);
    }
}

#[test]
fn reset_keeps_live_handles_but_drops_their_names() {
    let mut session = Session::new();
    let handle = session.create_vector(&[1.0, 2.0]);
    session.bind("v", handle).unwrap();
    session.reset();
    // The name is gone, the handle itself is still alive for the host.
    assert!(matches!(session.eval("sum(v)"), Err(Error::UndefinedVariable(_))));
    assert_eq!(session.len(handle).unwrap(), 2);
}

#[test]
fn rendering_contracts() {
    let mut session = Session::new();
    assert_eq!(session.eval("2.5").unwrap(), "2.5");
    assert_eq!(session.eval("14").unwrap(), "14");
    assert_eq!(session.eval("[1, 2, 3]").unwrap(), "[1, 2, 3]");
    assert_eq!(session.eval("[[1, 2], [3, 4]]").unwrap(), "[[1, 2], [3, 4]]");
    assert_eq!(session.eval("complex(1, -2)").unwrap(), "1 - 2i");
    assert_eq!(session.eval("3i").unwrap(), "3i");
    assert_eq!(session.eval("x => x").unwrap(), "<function>");
}

#[test]
fn error_messages_are_human_readable() {
    let mut session = Session::new();
    let err = session.eval("dot([1, 2], [1, 2, 3])").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("dot"), "unexpected message: {message}");

    let err = session.eval("hanning(1)").unwrap_err();
    assert!(err.to_string().contains("hanning"));
}
