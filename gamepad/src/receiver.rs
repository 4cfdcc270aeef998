/*!
Threaded UDP gamepad receiver.

This module provides the background reception loop:
1. A dedicated worker thread owns the UDP socket and blocks on receive.
2. Every datagram of the family's exact packet size is validated and decoded;
   anything else is silently dropped and the loop continues.
3. Each successful decode overwrites the published key-state snapshot,
   increments the received-packet counter and fires the registered callback.

Readers on other threads take full snapshots through [`GamepadReceiver::get_keys`]
and never observe a partially written record.
*/

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::keys::ButtonLabels;
use crate::protocol::Protocol;

/// Callback invoked on the worker thread after each successful decode,
/// receiving the monotonically increasing received-packet count.
///
/// Callbacks run on the hot path: a slow callback directly throttles the
/// receive rate. Signal another thread instead of doing heavy work here.
pub type UpdateCallback = Box<dyn FnMut(u64) + Send>;

/// Background UDP receiver for one gamepad, generic over the device family.
///
/// One worker thread per instance, bound to the object's lifetime: `start`
/// spawns it, `stop` (or drop) flips the running flag and joins it.
pub struct GamepadReceiver<P: Protocol> {
    bind_addr: String,
    port: u16,
    local_port: Option<u16>,
    keys: Arc<Mutex<P::Keys>>,
    packet_count: Arc<AtomicU64>,
    callback: Arc<Mutex<Option<UpdateCallback>>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    labels: ButtonLabels,
}

impl<P: Protocol> GamepadReceiver<P> {
    /// Create a receiver listening on all interfaces at the given port
    pub fn new(port: u16) -> Self {
        Self::with_bind_addr("0.0.0.0", port)
    }

    /// Create a receiver with an explicit bind address
    pub fn with_bind_addr(bind_addr: impl Into<String>, port: u16) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            port,
            local_port: None,
            keys: Arc::new(Mutex::new(P::Keys::default())),
            packet_count: Arc::new(AtomicU64::new(0)),
            callback: Arc::new(Mutex::new(None)),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            labels: ButtonLabels::new(),
        }
    }

    /// Start the reception loop.
    ///
    /// Binds the socket synchronously, so bind failures (port in use,
    /// permission denied) surface here as [`crate::GamepadError::Transport`]
    /// and are not retried. No-op if already started.
    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        let socket_addr = format!("{}:{}", self.bind_addr, self.port);
        let socket = std::net::UdpSocket::bind(&socket_addr)?;
        self.local_port = Some(socket.local_addr()?.port());
        info!("UDP socket bound to {}", socket_addr);

        // Generous receive buffer so bursts survive callback hiccups
        let sock_ref = socket2::SockRef::from(&socket);
        sock_ref.set_recv_buffer_size(1024 * 1024)?;

        // tokio takes over the socket; it must be non-blocking first
        socket.set_nonblocking(true)?;

        self.running.store(true, Ordering::SeqCst);

        let keys = Arc::clone(&self.keys);
        let packet_count = Arc::clone(&self.packet_count);
        let callback = Arc::clone(&self.callback);
        let running = Arc::clone(&self.running);

        let worker = thread::spawn(move || {
            let rt = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create receiver runtime: {}", e);
                    running.store(false, Ordering::SeqCst);
                    return;
                }
            };
            rt.block_on(Self::receive_loop(socket, keys, packet_count, callback, running));
        });
        self.worker = Some(worker);

        Ok(())
    }

    /// Stop the reception loop and join the worker thread.
    ///
    /// Called automatically on drop; safe to call if never started.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Receiver worker thread panicked");
            }
        }
    }

    /// Most recently published key-state snapshot, by value.
    ///
    /// Short critical section copy: never blocks on the socket and never
    /// returns a torn record.
    pub fn get_keys(&self) -> P::Keys {
        *lock_ignoring_poison(&self.keys)
    }

    /// Number of valid packets received since start
    pub fn packet_count(&self) -> u64 {
        self.packet_count.load(Ordering::SeqCst)
    }

    /// Register the update callback, replacing any previous one.
    ///
    /// The callback runs on the receiver's worker thread; see
    /// [`UpdateCallback`] for the latency contract. Safe to call from
    /// within the callback itself: the replacement takes effect for the
    /// next packet.
    pub fn set_update_callback(&self, callback: impl FnMut(u64) + Send + 'static) {
        *lock_ignoring_poison(&self.callback) = Some(Box::new(callback));
    }

    /// Button status display labels (index 0 = released, 1 = pressed)
    pub fn button_labels(&self) -> &ButtonLabels {
        &self.labels
    }

    /// Actual bound port, available after `start`. Differs from the
    /// requested port only for port-0 binds.
    pub fn local_port(&self) -> Option<u16> {
        self.local_port
    }

    /// Worker loop: receive, validate, decode, publish, notify.
    async fn receive_loop(
        socket: std::net::UdpSocket,
        keys: Arc<Mutex<P::Keys>>,
        packet_count: Arc<AtomicU64>,
        callback: Arc<Mutex<Option<UpdateCallback>>>,
        running: Arc<AtomicBool>,
    ) {
        let socket = match UdpSocket::from_std(socket) {
            Ok(socket) => socket,
            Err(e) => {
                error!("Failed to register socket with runtime: {}", e);
                running.store(false, Ordering::SeqCst);
                return;
            }
        };

        // Oversized so wrong-size datagrams are seen at their real length
        // instead of being truncated into valid-looking packets
        let mut buffer = vec![0u8; 2048];
        let mut dropped = 0u64;

        while running.load(Ordering::SeqCst) {
            // Bounded wait so the running flag is checked periodically
            let timeout = Duration::from_millis(100);

            match tokio::time::timeout(timeout, socket.recv_from(&mut buffer)).await {
                Ok(Ok((received, _from))) => {
                    let datagram = &buffer[..received];
                    if received != P::PACKET_SIZE || !P::is_valid(datagram) {
                        // Expected condition on a fire-and-forget link:
                        // garbled datagrams and cross-talk are dropped with
                        // no state change and no callback
                        dropped += 1;
                        if dropped % 1000 == 0 {
                            debug!("Dropped {} malformed datagrams so far", dropped);
                        }
                        continue;
                    }

                    let decoded = P::decode(datagram);
                    *lock_ignoring_poison(&keys) = decoded;
                    let count = packet_count.fetch_add(1, Ordering::SeqCst) + 1;

                    // The callback runs with the slot released so it may
                    // itself call set_update_callback; a replacement
                    // installed meanwhile wins over the running one
                    let current = lock_ignoring_poison(&callback).take();
                    if let Some(mut cb) = current {
                        cb(count);
                        let mut slot = lock_ignoring_poison(&callback);
                        if slot.is_none() {
                            *slot = Some(cb);
                        }
                    }

                    if count % 1000 == 0 {
                        info!("Received {} valid packets ({} dropped)", count, dropped);
                    }
                }
                Ok(Err(e)) => {
                    // Transport failure is fatal to this receiver; the loop
                    // terminates and is not retried
                    error!("UDP receive error, terminating receiver: {}", e);
                    running.store(false, Ordering::SeqCst);
                    break;
                }
                Err(_) => {
                    // Timeout, re-check the running flag
                    continue;
                }
            }
        }

        info!(
            "Receiver stopped after {} valid packets ({} dropped)",
            packet_count.load(Ordering::SeqCst),
            dropped
        );
    }
}

impl<P: Protocol> Drop for GamepadReceiver<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A poisoned lock only means a reader panicked mid-copy; the protected
/// value is a plain `Copy` record and stays usable.
fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
