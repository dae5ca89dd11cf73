/**
 * Command Queue
 *
 * Bounded FIFO handoff between the ingress and control workers.
 * The producer never waits: a put against a full queue sheds the newest
 * command and reports false. The consumer blocks until a command arrives.
 */

use std::time::Duration;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError, RecvTimeoutError};
use crate::error::{Error, Result};
use crate::protocol::Command;

pub const QUEUE_CAPACITY: usize = 10;

//create a queue and hand back its two halves
pub fn command_queue(capacity: usize) -> (CommandProducer, CommandConsumer){
    let (tx, rx) = bounded(capacity);
    (CommandProducer{ tx, capacity }, CommandConsumer{ rx })
}

//producer half, owned by the ingress worker
//clones keep the queue connected after the ingress worker is gone
#[derive(Clone)]
pub struct CommandProducer{
    tx: Sender<Command>,
    capacity: usize,
}

impl CommandProducer{
    //non blocking, false when full (queue left untouched)
    pub fn put(&self, cmd: Command) -> bool{
        self.try_put(cmd).is_ok()
    }

    pub fn try_put(&self, cmd: Command) -> Result<()>{
        match self.tx.try_send(cmd){
            Ok(()) => Ok(()),
            Err(TrySendError::Full(c)) => Err(Error::QueueFull{ sequence: c.sequence }),
            Err(TrySendError::Disconnected(_)) => Err(Error::Disconnected),
        }
    }

    pub fn len(&self) -> usize{
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool{
        self.tx.is_empty()
    }

    pub fn is_full(&self) -> bool{
        self.tx.is_full()
    }

    pub fn capacity(&self) -> usize{
        self.capacity
    }
}

//consumer half, owned by the control worker
pub struct CommandConsumer{
    rx: Receiver<Command>,
}

impl CommandConsumer{
    //blocks until a command is available
    //None only once every producer is gone and the queue is drained
    pub fn take(&self) -> Option<Command>{
        self.rx.recv().ok()
    }

    pub fn take_timeout(&self, timeout: Duration) -> Result<Option<Command>>{
        match self.rx.recv_timeout(timeout){
            Ok(cmd) => Ok(Some(cmd)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Disconnected),
        }
    }

    pub fn try_take(&self) -> Option<Command>{
        self.rx.try_recv().ok()
    }

    pub fn len(&self) -> usize{
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool{
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests{
    use super::*;
    use std::thread;

    fn cmd(seq: u32) -> Command{
        Command::new(seq, 0x8080_8080_8080)
    }

    #[test]
    fn test_fifo_order(){
        let (tx, rx) = command_queue(QUEUE_CAPACITY);
        for i in 0..5{
            assert!(tx.put(cmd(i)));
        }
        for i in 0..5{
            assert_eq!(rx.take().unwrap().sequence, i);
        }
        assert!(rx.try_take().is_none());
    }

    #[test]
    fn test_eleventh_put_dropped(){
        let (tx, rx) = command_queue(QUEUE_CAPACITY);
        for i in 0..10{
            assert!(tx.put(cmd(i)));
        }
        assert!(tx.is_full());
        assert!(!tx.put(cmd(10)));
        assert_eq!(tx.len(), 10);

        //the shed command is the newest one
        let seqs: Vec<u32> = (0..10).map(|_| rx.take().unwrap().sequence).collect();
        assert_eq!(seqs, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_try_put_reports_full(){
        let (tx, _rx) = command_queue(1);
        tx.try_put(cmd(1)).unwrap();
        match tx.try_put(cmd(2)){
            Err(Error::QueueFull{ sequence }) => assert_eq!(sequence, 2),
            other => panic!("expected QueueFull, got {:?}", other),
        }
    }

    #[test]
    fn test_interleaved_fifo(){
        let (tx, rx) = command_queue(QUEUE_CAPACITY);
        let mut taken = Vec::new();
        let mut next = 0;
        for round in 0..20{
            for _ in 0..(round % 4){
                if tx.put(cmd(next)){
                    next += 1;
                }
            }
            if let Some(c) = rx.try_take(){
                taken.push(c.sequence);
            }
        }
        while let Some(c) = rx.try_take(){
            taken.push(c.sequence);
        }
        assert_eq!(taken, (0..next).collect::<Vec<_>>());
    }

    #[test]
    fn test_take_blocks_until_put(){
        let (tx, rx) = command_queue(QUEUE_CAPACITY);
        let consumer = thread::spawn(move ||{
            rx.take().map(|c| c.sequence)
        });
        thread::sleep(Duration::from_millis(20));
        assert!(tx.put(cmd(42)));
        assert_eq!(consumer.join().unwrap(), Some(42));
    }

    #[test]
    fn test_threaded_order_preserved(){
        let (tx, rx) = command_queue(QUEUE_CAPACITY);
        let producer = thread::spawn(move ||{
            let mut sent = Vec::new();
            for i in 0..500{
                if tx.put(cmd(i)){
                    sent.push(i);
                }
            }
            sent
        });
        let consumer = thread::spawn(move ||{
            let mut received = Vec::new();
            while let Some(c) = rx.take(){
                received.push(c.sequence);
            }
            received
        });

        let sent = producer.join().unwrap();
        let received = consumer.join().unwrap();
        assert_eq!(sent, received);
    }

    #[test]
    fn test_take_timeout(){
        let (tx, rx) = command_queue(QUEUE_CAPACITY);
        assert!(rx.take_timeout(Duration::from_millis(5)).unwrap().is_none());
        drop(tx);
        assert!(matches!(rx.take_timeout(Duration::from_millis(5)), Err(Error::Disconnected)));
    }
}
