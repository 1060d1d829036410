// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::mpsc;
use std::thread;

use warp_math::config::DEFAULT_MAX_POOL_SIZE;
use warp_math::pool::local_pool_len;
use warp_math::{fetch_temp, release_temp, MathConfig, Matrix4, Pooled, Quaternion, Vector3};

#[test]
fn release_then_fetch_reuses_same_box() {
    let mut v = fetch_temp::<Vector3>();
    v.set(1.0, 2.0, 3.0);
    let addr: *const Vector3 = &*v;
    release_temp(v);

    let again = fetch_temp::<Vector3>();
    assert_eq!(&*again as *const Vector3, addr);
    // Vectors are not reset on reuse.
    assert_eq!(*again, Vector3::new(1.0, 2.0, 3.0));
}

#[test]
fn rotation_types_come_back_as_identity() {
    let mut m = fetch_temp::<Matrix4>();
    m.multiply_scalar_local(5.0);
    release_temp(m);
    assert_eq!(*fetch_temp::<Matrix4>(), Matrix4::IDENTITY);

    let mut q = Pooled::<Quaternion>::fetch();
    q.set(1.0, 2.0, 3.0, 4.0);
    drop(q);
    assert_eq!(*Pooled::<Quaternion>::fetch(), Quaternion::IDENTITY);
}

#[test]
fn excess_releases_are_dropped() {
    let boxes: Vec<_> = (0..DEFAULT_MAX_POOL_SIZE + 4)
        .map(|_| fetch_temp::<Vector3>())
        .collect();
    let mut tag = 0.0;
    let mut last_kept = f64::NAN;
    for mut b in boxes {
        b.set(tag, 0.0, 0.0);
        if local_pool_len::<Vector3>() < DEFAULT_MAX_POOL_SIZE {
            last_kept = tag;
        }
        tag += 1.0;
        release_temp(b);
    }
    assert_eq!(local_pool_len::<Vector3>(), DEFAULT_MAX_POOL_SIZE);
    // The full pool kept the earlier releases; the last four were dropped.
    assert_eq!(last_kept, tag - 5.0);
    assert_eq!(fetch_temp::<Vector3>().x(), last_kept);
}

#[test]
fn threads_never_see_each_others_releases() {
    let (tx, rx) = mpsc::channel::<()>();
    let mut v = fetch_temp::<Vector3>();
    v.set(9.0, 9.0, 9.0);
    release_temp(v);
    let handle = thread::spawn(move || {
        assert_eq!(local_pool_len::<Vector3>(), 0);
        let fresh = fetch_temp::<Vector3>();
        assert_eq!(*fresh, Vector3::ZERO);
        release_temp(fresh);
        tx.send(()).unwrap();
        local_pool_len::<Vector3>()
    });
    rx.recv().unwrap();
    assert_eq!(handle.join().unwrap(), 1);
    assert_eq!(local_pool_len::<Vector3>(), 1);
    assert_eq!(*fetch_temp::<Vector3>(), Vector3::splat(9.0));
}

#[test]
fn disabled_pools_allocate_and_drop() {
    thread::spawn(|| {
        MathConfig::unpooled().install();
        let v = Pooled::<Vector3>::fetch();
        drop(v);
        assert_eq!(local_pool_len::<Vector3>(), 0);
    })
    .join()
    .unwrap();
}

#[test]
fn guards_release_on_early_return() {
    fn first_error(values: &[f64]) -> Result<f64, usize> {
        let mut acc = Pooled::<Vector3>::fetch();
        for (i, v) in values.iter().enumerate() {
            if v.is_nan() {
                return Err(i);
            }
            acc.add_local(Vector3::splat(*v));
        }
        Ok(acc.x())
    }

    thread::spawn(|| {
        assert_eq!(first_error(&[1.0, f64::NAN]), Err(1));
        assert_eq!(local_pool_len::<Vector3>(), 1);
        assert!(first_error(&[1.0, 2.0]).is_ok());
        assert_eq!(local_pool_len::<Vector3>(), 1);
    })
    .join()
    .unwrap();
}
