//! Accept loop and per-connection protocol loop

use std::cmp::max;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use netbuf::Buf;
use num_cpus;
use threadpool::ThreadPool;

use headers;
use parser::{self, ParseError};
use serializer;
use server::{Config, Dispatcher, Error};
use server::error_page::error_page;


pub const DEFAULT_PORT: u16 = 8080;


/// The accept loop plus the worker pool serving its connections
pub struct Server<D> {
    listener: TcpListener,
    addr: SocketAddr,
    workers: ThreadPool,
    dispatcher: Arc<D>,
    config: Arc<Config>,
    closing: Arc<AtomicBool>,
}

impl<D: Dispatcher> Server<D> {
    /// Bind the configured port.
    ///
    /// When the configured port is occupied and it is the default
    /// one, an ephemeral port is bound instead; `local_addr()` tells
    /// which one was taken.
    pub fn bind(config: &Arc<Config>, dispatcher: D)
        -> io::Result<Server<D>>
    {
        let listener = match TcpListener::bind(("0.0.0.0", config.port)) {
            Ok(listener) => listener,
            Err(ref e) if e.kind() == io::ErrorKind::AddrInUse
                && config.port == DEFAULT_PORT =>
            {
                warn!("port {} is taken, binding an ephemeral port",
                    config.port);
                TcpListener::bind(("0.0.0.0", 0))?
            }
            Err(e) => return Err(e),
        };
        let addr = listener.local_addr()?;
        let workers = if config.workers == 0 {
            max(2, num_cpus::get() * 2)
        } else {
            config.workers
        };
        Ok(Server {
            listener: listener,
            addr: addr,
            workers: ThreadPool::new(workers),
            dispatcher: Arc::new(dispatcher),
            config: config.clone(),
            closing: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Accept connections until shutdown, handing each one to a
    /// worker
    pub fn run(&self) -> io::Result<()> {
        info!("listening on {}", self.addr);
        for stream in self.listener.incoming() {
            if self.closing.load(Ordering::SeqCst) {
                break;
            }
            match stream {
                Ok(stream) => {
                    let dispatcher = self.dispatcher.clone();
                    let config = self.config.clone();
                    let closing = self.closing.clone();
                    self.workers.execute(move || {
                        serve_connection(stream, dispatcher, config,
                            closing);
                    });
                }
                Err(e) => {
                    debug!("accept error: {}", e);
                }
            }
        }
        info!("listener on {} closed", self.addr);
        Ok(())
    }

    /// Stop accepting connections and give busy workers the grace
    /// period to finish
    pub fn shutdown(&self) {
        self.closing.store(true, Ordering::SeqCst);
        // a wake-up connection unblocks the accept loop
        let _ = TcpStream::connect(("127.0.0.1", self.addr.port()));
        let deadline = Instant::now() + self.config.shutdown_grace;
        while self.workers.active_count() > 0
            || self.workers.queued_count() > 0
        {
            if Instant::now() >= deadline {
                warn!("shutdown grace expired with {} busy workers",
                    self.workers.active_count());
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

fn serve_connection<D: Dispatcher>(mut stream: TcpStream,
    dispatcher: Arc<D>, config: Arc<Config>, closing: Arc<AtomicBool>)
{
    let peer = stream.peer_addr().map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    trace!("connection from {}", peer);
    match connection_loop(&mut stream, &*dispatcher, &config, &closing) {
        Ok(()) => trace!("session with {} done", peer),
        Err(Error::Parse(ParseError::Closed)) => {
            trace!("{} disconnected", peer);
        }
        Err(Error::Parse(ParseError::Io(ref e))) |
        Err(Error::Io(ref e)) if is_timeout(e) => {
            debug!("session with {} timed out", peer);
        }
        Err(e) => {
            debug!("session with {} ended: {}", peer, e);
        }
    }
}

/// Serve sequential exchanges on one connection until an error, a
/// timeout or a negotiated close
fn connection_loop<D: Dispatcher>(stream: &mut TcpStream, dispatcher: &D,
    config: &Config, closing: &AtomicBool)
    -> Result<(), Error>
{
    stream.set_read_timeout(Some(config.idle_timeout))?;
    let mut buf = Buf::new();
    loop {
        let req = parser::parse_request(stream, &mut buf)?;
        let keep_alive = match req.header("Connection") {
            Some(value) if headers::is_keep_alive(value) => true,
            Some(value) if headers::is_close(value) => false,
            _ => req.version().keep_alive_by_default(),
        };
        trace!("{} {}", req.method(), req.path());
        let resp = match panic::catch_unwind(
            AssertUnwindSafe(|| dispatcher.dispatch(req)))
        {
            Ok(resp) => resp,
            Err(_) => {
                error!("dispatcher panicked, answering with a 500");
                error_page(500)
            }
        };
        serializer::write_response(stream, &resp, keep_alive)?;
        if !keep_alive || closing.load(Ordering::SeqCst) {
            return Ok(());
        }
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}
