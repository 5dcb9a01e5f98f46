//! Adapter surface binding a collection to a host renderer.
//!
//! [`Binder`] wires the collaborators (row factory, view typer,
//! comparator, optional listeners) around a [`BoundCollection`] and
//! forwards the listeners to every row it creates. Construction goes
//! through [`BinderBuilder`]; only the row factory is mandatory, the
//! rest default to built-ins.

use std::rc::Rc;
use std::time::Duration;

use crate::collection::BoundCollection;
use crate::compare::{Comparator, EqComparator};
use crate::error::{BindError, BindResult};
use crate::row::{OnItemBind, OnItemClick, Row, RowFactory, SingleViewType, ViewType, ViewTyper};
use crate::sink::ChangeSink;

/// Renderer-facing adapter over a [`BoundCollection`].
pub struct Binder<T, F, C = EqComparator>
where
    F: RowFactory<T>,
{
    collection: BoundCollection<T, C>,
    row_factory: F,
    view_typer: Box<dyn ViewTyper<T>>,
    on_item_click: Option<OnItemClick<T>>,
    on_item_bind: Option<OnItemBind<T>>,
}

impl<T, F> Binder<T, F>
where
    T: Send + Sync + 'static,
    F: RowFactory<T>,
{
    /// Start building a binder.
    pub fn builder() -> BinderBuilder<T, F> {
        BinderBuilder::new()
    }
}

impl<T, F, C> Binder<T, F, C>
where
    T: Send + Sync + 'static,
    F: RowFactory<T>,
    C: Comparator<T> + Send + Sync + 'static,
{
    /// Number of displayed items.
    pub fn item_count(&self) -> usize {
        self.collection.item_count()
    }

    /// Item at `position` in the committed snapshot.
    pub fn item(&self, position: usize) -> Option<&T> {
        self.collection.get(position)
    }

    /// View type of the row displaying `position`.
    pub fn view_type_at(&self, position: usize) -> Option<ViewType> {
        self.collection
            .get(position)
            .map(|item| self.view_typer.view_type_of(item))
    }

    /// Create a row for `view_type` and attach the configured listeners.
    pub fn create_row(&mut self, view_type: ViewType) -> F::Row {
        let mut row = self.row_factory.row_for_type(view_type);
        if let Some(handler) = &self.on_item_click {
            row.attach_on_click(Rc::clone(handler));
        }
        if let Some(handler) = &self.on_item_bind {
            row.attach_on_bind(Rc::clone(handler));
        }
        row
    }

    /// Bind the item at `position` to `row`.
    ///
    /// Returns `false` when `position` is outside the committed snapshot.
    pub fn bind_row(&self, row: &mut F::Row, position: usize) -> bool {
        match self.collection.get(position) {
            Some(item) => {
                row.bind(item);
                true
            }
            None => false,
        }
    }

    /// The host recycled `row`; release its item state.
    pub fn recycle_row(&self, row: &mut F::Row) {
        row.unbind();
    }

    /// Replace the displayed items. See [`BoundCollection::update`].
    pub fn set_items(&mut self, items: Option<Vec<T>>, sink: &mut dyn ChangeSink) {
        self.collection.update(items, sink);
    }

    /// Commit a completed background diff, if still current.
    pub fn poll(&mut self, sink: &mut dyn ChangeSink) -> bool {
        self.collection.poll(sink)
    }

    /// Block until the outstanding diff commits or `timeout` elapses.
    pub fn flush(&mut self, sink: &mut dyn ChangeSink, timeout: Duration) -> bool {
        self.collection.flush(sink, timeout)
    }

    /// Leaving the host: drop interest in any outstanding diff.
    pub fn detach(&mut self) {
        self.collection.cancel_pending();
    }

    /// The underlying collection.
    pub fn collection(&self) -> &BoundCollection<T, C> {
        &self.collection
    }
}

/// Builder for [`Binder`].
///
/// Optional collaborators default to their built-ins: [`SingleViewType`]
/// and [`EqComparator`]. The row factory has no sensible default and its
/// absence fails [`build`](Self::build) immediately.
pub struct BinderBuilder<T, F, C = EqComparator>
where
    F: RowFactory<T>,
{
    row_factory: Option<F>,
    view_typer: Box<dyn ViewTyper<T>>,
    comparator: C,
    on_item_click: Option<OnItemClick<T>>,
    on_item_bind: Option<OnItemBind<T>>,
}

impl<T, F> BinderBuilder<T, F>
where
    F: RowFactory<T>,
{
    fn new() -> Self {
        Self {
            row_factory: None,
            view_typer: Box::new(SingleViewType),
            comparator: EqComparator,
            on_item_click: None,
            on_item_bind: None,
        }
    }
}

impl<T, F, C> BinderBuilder<T, F, C>
where
    F: RowFactory<T>,
{
    /// The factory producing rows. Required.
    pub fn row_factory(mut self, factory: F) -> Self {
        self.row_factory = Some(factory);
        self
    }

    /// Classify items into view types. Defaults to [`SingleViewType`].
    pub fn view_typer(mut self, typer: impl ViewTyper<T> + 'static) -> Self {
        self.view_typer = Box::new(typer);
        self
    }

    /// Identity/content comparator. Defaults to [`EqComparator`].
    pub fn comparator<C2>(self, comparator: C2) -> BinderBuilder<T, F, C2> {
        BinderBuilder {
            row_factory: self.row_factory,
            view_typer: self.view_typer,
            comparator,
            on_item_click: self.on_item_click,
            on_item_bind: self.on_item_bind,
        }
    }

    /// Click handler forwarded to every created row.
    pub fn on_item_click(mut self, handler: impl Fn(&T, usize) + 'static) -> Self {
        self.on_item_click = Some(Rc::new(handler));
        self
    }

    /// Bind observer forwarded to every created row.
    pub fn on_item_bind(mut self, handler: impl Fn(&T, usize) + 'static) -> Self {
        self.on_item_bind = Some(Rc::new(handler));
        self
    }

    /// Assemble the binder.
    ///
    /// Fails fast with [`BindError::MissingRowFactory`] when no row
    /// factory was supplied.
    pub fn build(self) -> BindResult<Binder<T, F, C>>
    where
        T: Send + Sync + 'static,
        C: Comparator<T> + Send + Sync + 'static,
    {
        let Some(row_factory) = self.row_factory else {
            return Err(BindError::MissingRowFactory);
        };
        Ok(Binder {
            collection: BoundCollection::new(self.comparator),
            row_factory,
            view_typer: self.view_typer,
            on_item_click: self.on_item_click,
            on_item_bind: self.on_item_bind,
        })
    }
}
