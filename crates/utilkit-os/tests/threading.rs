//! Wrappers can change threads and sit behind a caller's lock.

use std::sync::Mutex;

use utilkit_os::{SharedLibrary, SharedMemory, SymbolAddress};

fn assert_send<T: Send>() {}

#[test]
fn wrappers_are_send() {
    assert_send::<SharedMemory>();
    assert_send::<SharedLibrary>();
    assert_send::<SymbolAddress>();
    assert_send::<Mutex<SharedMemory>>();
}

#[cfg(unix)]
#[test]
fn mapped_segment_moves_between_threads_under_a_mutex() {
    use std::sync::Arc;
    use std::thread;

    use utilkit_os::OpenMode;

    let name = format!("/utilkit-thread-{}", std::process::id());
    let mut segment = SharedMemory::create_or_open(&name, 64, OpenMode::CreateNew).unwrap();
    segment.map().unwrap();
    let shared = Arc::new(Mutex::new(segment));

    let workers: Vec<_> = (0..4u8)
        .map(|i| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let mut segment = shared.lock().unwrap();
                segment.as_mut_slice().unwrap()[usize::from(i)] = i + 1;
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let segment = shared.lock().unwrap();
    assert_eq!(&segment.as_slice().unwrap()[..4], &[1, 2, 3, 4]);
    drop(segment);
    SharedMemory::remove(&name).unwrap();
}

#[cfg(target_os = "linux")]
#[test]
fn library_resolves_on_a_worker_thread() {
    let library = SharedLibrary::load("libc.so.6").unwrap();
    let address = std::thread::spawn(move || {
        let mut library = library;
        library.resolve("getpid").unwrap()
    })
    .join()
    .unwrap();
    assert_ne!(address.addr(), 0);
}
