// Example: drive a model against an in-memory "server" with a grid that scrolls mid-flight.
use remote_model::{
    Grid, Outcome, Record, RemoteModel, RemoteModelOptions, Request, RequestId, Response,
    RowRange, Total, Transport,
};

#[derive(Clone, Debug)]
struct Doc {
    id: u64,
}

impl Record for Doc {
    type Id = u64;

    fn id(&self) -> Option<u64> {
        Some(self.id)
    }
}

#[derive(Default)]
struct PrintGrid {
    viewport: RowRange,
    selected: Vec<usize>,
}

impl Grid for PrintGrid {
    fn viewport(&mut self, top: Option<usize>) -> RowRange {
        if let Some(top) = top {
            self.viewport = RowRange::new(top, top + self.viewport.len());
        }
        self.viewport
    }

    fn invalidate_row(&mut self, _row: usize) {}

    fn set_row_count(&mut self, total: Total) {
        println!("row count -> {}", total.row_count());
    }

    fn selected_rows(&self) -> Vec<usize> {
        self.selected.clone()
    }

    fn set_selected_rows(&mut self, rows: Vec<usize>) {
        self.selected = rows;
    }
}

#[derive(Default)]
struct Inbox {
    pending: Vec<(RequestId, Request)>,
}

impl Transport for Inbox {
    fn send(&mut self, id: RequestId, request: &Request) {
        println!("send {id}: {:?}", request.params);
        self.pending.push((id, request.clone()));
    }

    fn abort(&mut self, id: RequestId) {
        println!("abort {id}");
        self.pending.retain(|(pending, _)| *pending != id);
    }
}

const TOTAL: usize = 10_000;

fn serve(request: &Request) -> Response<Doc> {
    let param = |key: &str| {
        request
            .params
            .get(key)
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0)
    };
    let from = param("from");
    let to = param("to").min(TOTAL);
    let records = (from..to).map(|i| Doc { id: i as u64 }).collect();
    Response::rows(from, to, TOTAL, records)
}

fn main() {
    let grid = PrintGrid {
        viewport: RowRange::new(0, 25),
        ..PrintGrid::default()
    };
    let mut model = RemoteModel::new(
        RemoteModelOptions::new().with_minimum_load(100),
        grid,
        Inbox::default(),
    );
    model.on_loaded(|e| println!("loaded {:?} total={:?}", e.range, e.total));

    model.viewport_changed(false);
    // The user jumps far down before the first page arrives; this change is dropped for now.
    model.grid_mut().viewport = RowRange::new(5_000, 5_025);
    model.viewport_changed(false);

    while let Some((id, request)) = model.transport_mut().pending.pop() {
        let settlement = model.complete(id, Outcome::Success(serve(&request)));
        println!("settled {id}: {settlement:?}");
    }
    println!("cached rows: {:?}", model.state().cached_rows);
}
