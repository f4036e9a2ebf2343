use std::{cell::Cell, rc::Rc};

type Callback<T> = Box<dyn FnMut(&T)>;

struct Observer<T> {
    alive: Rc<Cell<bool>>,
    callback: Callback<T>,
}

/// Handle returned on registration.
///
/// Dropping it keeps the observer alive, only
/// `unsubscribe` stops further invocations
#[must_use = "the observer can only be removed through this handle"]
#[derive(Debug, Clone)]
pub struct Subscription {
    alive: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        self.alive.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.alive.get()
    }
}

/// Per-instance observer list, events are delivered
/// synchronously in subscription order
pub struct Observers<T> {
    observers: Vec<Observer<T>>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
        }
    }
}

impl<T> Observers<T> {
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let alive = Rc::new(Cell::new(true));

        self.observers.push(Observer {
            alive: alive.clone(),
            callback: Box::new(callback),
        });

        Subscription { alive }
    }

    pub fn publish(&mut self, event: &T) {
        self.observers.retain(|x| x.alive.get());

        for observer in self.observers.iter_mut() {
            // Observer could be unsubscribed by a previous one
            if observer.alive.get() {
                (observer.callback)(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.observers.iter().filter(|x| x.alive.get()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn test_publish_order_and_unsubscribe() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::<u32>::default();

        let first = {
            let log = log.clone();
            observers.subscribe(move |x| log.borrow_mut().push(("first", *x)))
        };

        let _second = {
            let log = log.clone();
            observers.subscribe(move |x| log.borrow_mut().push(("second", *x)))
        };

        observers.publish(&1);
        first.unsubscribe();
        observers.publish(&2);

        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("second", 1), ("second", 2)]
        );
        assert_eq!(observers.len(), 1);
    }
}
