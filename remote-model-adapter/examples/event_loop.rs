use remote_model::{Grid, RemoteModelOptions, RowRange, SortDirection, Total};
use remote_model_adapter::{Controller, query_pairs};
use serde_json::json;

#[derive(Default)]
struct Viewport {
    range: RowRange,
}

impl Grid for Viewport {
    fn viewport(&mut self, top: Option<usize>) -> RowRange {
        if let Some(top) = top {
            self.range = RowRange::new(top, top + self.range.len());
        }
        self.range
    }

    fn invalidate_row(&mut self, _row: usize) {}

    fn set_row_count(&mut self, _total: Total) {}

    fn selected_rows(&self) -> Vec<usize> {
        Vec::new()
    }

    fn set_selected_rows(&mut self, _rows: Vec<usize>) {}
}

fn server(params: &std::collections::BTreeMap<String, String>) -> String {
    let filter = params.get("filter").cloned().unwrap_or_default();
    let names: Vec<String> = (0..500)
        .map(|i| format!("file-{i:03}.txt"))
        .filter(|n| n.contains(&filter))
        .collect();
    let from: usize = params.get("from").and_then(|v| v.parse().ok()).unwrap_or(0);
    let to: usize = params
        .get("to")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
        .min(names.len());
    let records: Vec<_> = names[from.min(to)..to]
        .iter()
        .map(|n| json!({ "id": n, "name": n }))
        .collect();
    json!({ "from": from, "to": to, "total": names.len(), "records": records }).to_string()
}

fn main() {
    // Example: an event loop that owns the I/O. Each tick: start/cancel what the controller asks
    // for, then deliver replies.
    let mut c = Controller::new(
        RemoteModelOptions::new()
            .with_sorting("name", SortDirection::Ascending)
            .with_extra_query("filter", "")
            .with_minimum_load(50),
        Viewport {
            range: RowRange::new(0, 20),
        },
    );

    c.on_viewport_changed();
    for tick in 0..4 {
        if tick == 1 {
            c.set_search("7");
        }
        let dispatch = c.poll();
        for id in &dispatch.cancel {
            println!("tick {tick}: cancel {id}");
        }
        for (id, request) in dispatch.start {
            println!("tick {tick}: GET ?{}", query_pairs(&request.params));
            let body = server(&request.params);
            match c.deliver(id, 200, &body) {
                Ok(settlement) => println!("tick {tick}: {settlement:?}"),
                Err(err) => println!("tick {tick}: {err}"),
            }
        }
    }
    println!("total: {:?}", c.model().total());
}
