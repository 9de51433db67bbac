//! Unbuffered product hand-off between walkers and the consumer
//!
//! A walker's [`ProductSender::emit`] only returns once the consumer has
//! taken the product out of [`ProductStream::next`]. A slow consumer
//! therefore throttles every walker without any queue to size.

use super::CancelSignal;
use crate::Product;
use tokio::sync::{mpsc, oneshot};

struct Delivery {
    product: Product,
    ack: oneshot::Sender<()>,
}

/// How an emission attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// The consumer received the product
    Delivered,
    /// The run was cancelled while waiting; the product is dropped
    Cancelled,
    /// The consumer went away
    Closed,
}

/// Producer side, cloned into every walker
#[derive(Clone)]
pub struct ProductSender {
    tx: mpsc::Sender<Delivery>,
}

impl ProductSender {
    /// Hands a product to the consumer, waiting until it is received
    pub async fn emit(&self, product: Product, cancel: &CancelSignal) -> EmitOutcome {
        let (ack, mut acked) = oneshot::channel();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return EmitOutcome::Cancelled,
            sent = self.tx.send(Delivery { product, ack }) => {
                if sent.is_err() {
                    return EmitOutcome::Closed;
                }
            }
        }

        // Closing `acked` on cancel makes the consumer discard the product,
        // unless it already took it
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                acked.close();
                match acked.try_recv() {
                    Ok(()) => EmitOutcome::Delivered,
                    Err(_) => EmitOutcome::Cancelled,
                }
            }
            received = &mut acked => match received {
                Ok(()) => EmitOutcome::Delivered,
                Err(_) => EmitOutcome::Closed,
            },
        }
    }
}

/// Consumer side of a run's accepted products
///
/// `next` returning `None` means every walker has finished and no further
/// product will follow.
pub struct ProductStream {
    rx: mpsc::Receiver<Delivery>,
    cancel: CancelSignal,
}

impl ProductStream {
    /// Receives the next accepted product, or `None` once the run is over
    pub async fn next(&mut self) -> Option<Product> {
        while let Some(delivery) = self.rx.recv().await {
            // A failed ack means the walker gave up on this hand-off
            if delivery.ack.send(()).is_ok() {
                return Some(delivery.product);
            }
        }
        None
    }

    /// Drains the stream to completion
    pub async fn collect(mut self) -> Vec<Product> {
        let mut products = Vec::new();
        while let Some(product) = self.next().await {
            products.push(product);
        }
        products
    }

    /// The cancel signal of the run feeding this stream
    ///
    /// A consumer can watch it to tear down its own transport when the run
    /// is stopped.
    pub fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    /// Completes once the run feeding this stream is stopped
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

/// Creates a connected sender/stream pair for one run
pub(crate) fn channel(cancel: CancelSignal) -> (ProductSender, ProductStream) {
    let (tx, rx) = mpsc::channel(1);
    (ProductSender { tx }, ProductStream { rx, cancel })
}
